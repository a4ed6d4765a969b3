use std::convert::Infallible;

use crate::prelude::*;

/// Creates an observable that emits a single value, then completes.
pub fn of<Item>(value: Item) -> ObservableOf<Item> { ObservableOf(value) }

#[derive(Clone)]
pub struct ObservableOf<Item>(Item);

impl<Item, Err, O> Observable<Item, Err, O> for ObservableOf<Item>
where
  Item: Send + 'static,
  O: Observer<Item, Err> + Send + 'static,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, mut observer: O, scheduler: &SharedScheduler) -> Self::Unsub {
    let subscription = SharedSubscription::default();
    let handle = subscription.clone();
    scheduler.spawn(async move {
      if handle.is_closed() {
        return;
      }
      if observer.next(self.0).await.is_stop() {
        return;
      }
      if !handle.is_closed() {
        observer.complete();
      }
    });
    subscription
  }
}

impl<Item> ObservableExt<Item, Infallible> for ObservableOf<Item> {}
