use std::marker::PhantomData;

use crate::prelude::*;

pub struct MapOp<S, F, Item> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _p: PhantomData<Item>,
}

impl<Item, B, Err, O, S, F> Observable<B, Err, O> for MapOp<S, F, Item>
where
  S: Observable<Item, Err, MapObserver<O, F>>,
  F: FnMut(Item) -> B,
  O: Observer<B, Err>,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O, scheduler: &SharedScheduler) -> Self::Unsub {
    self.source.actual_subscribe(
      MapObserver { observer, func: self.func },
      scheduler,
    )
  }
}

impl<Item, B, Err, S, F> ObservableExt<B, Err> for MapOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item) -> B,
{
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, B, Err, O, F> Observer<Item, Err> for MapObserver<O, F>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> B,
{
  // the acknowledgment of the mapped value is the acknowledgment of the
  // original one, so backpressure flows through untouched
  #[inline]
  fn next(&mut self, value: Item) -> AckFuture { self.observer.next((self.func)(value)) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::test_util::collect;

  #[tokio::test]
  async fn maps_every_value() {
    let (values, result) =
      collect::<_, i32, std::convert::Infallible>(observable::from_iter(100..103).map(|v| v * 2))
        .await;
    assert_eq!(values, vec![200, 202, 204]);
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn map_types_mixed() {
    let (values, _) = collect::<_, i32, std::convert::Infallible>(
      observable::from_iter(vec!['a', 'b', 'c']).map(|_| 1),
    )
    .await;
    assert_eq!(values.iter().sum::<i32>(), 3);
  }
}
