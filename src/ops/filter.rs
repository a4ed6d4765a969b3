use crate::ack;
use crate::prelude::*;

pub struct FilterOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for FilterOp<S, F>
where
  S: Observable<Item, Err, FilterObserver<O, F>>,
  F: FnMut(&Item) -> bool,
  O: Observer<Item, Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O, scheduler: &SharedScheduler) -> Self::Unsub {
    self.source.actual_subscribe(
      FilterObserver { observer, predicate: self.predicate },
      scheduler,
    )
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for FilterOp<S, F> where S: ObservableExt<Item, Err>
{}

pub struct FilterObserver<O, F> {
  observer: O,
  predicate: F,
}

impl<Item, Err, O, F> Observer<Item, Err> for FilterObserver<O, F>
where
  O: Observer<Item, Err>,
  F: FnMut(&Item) -> bool,
{
  fn next(&mut self, value: Item) -> AckFuture {
    if (self.predicate)(&value) {
      self.observer.next(value)
    } else {
      // a dropped value acknowledges itself
      ack::cont()
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }
}
