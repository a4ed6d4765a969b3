//! Trivial producers: `empty`, `never` and `throw`.

use std::convert::Infallible;
use std::marker::PhantomData;

use crate::prelude::*;

/// Creates an observable that emits nothing and completes immediately.
pub fn empty<Item>() -> ObservableEmpty<Item> { ObservableEmpty(PhantomData) }

pub struct ObservableEmpty<Item>(PhantomData<Item>);

impl<Item> Clone for ObservableEmpty<Item> {
  fn clone(&self) -> Self { ObservableEmpty(PhantomData) }
}

impl<Item, Err, O> Observable<Item, Err, O> for ObservableEmpty<Item>
where
  O: Observer<Item, Err>,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, observer: O, _scheduler: &SharedScheduler) -> Self::Unsub {
    observer.complete();
    SharedSubscription::default()
  }
}

impl<Item> ObservableExt<Item, Infallible> for ObservableEmpty<Item> {}

/// Creates an observable that emits nothing and never terminates.
///
/// The error type is carried as a phantom so `never` can stand in for any
/// stream shape, an errored one included.
pub fn never<Item, Err>() -> ObservableNever<Item, Err> { ObservableNever(PhantomData) }

pub struct ObservableNever<Item, Err>(PhantomData<(Item, Err)>);

impl<Item, Err> Clone for ObservableNever<Item, Err> {
  fn clone(&self) -> Self { ObservableNever(PhantomData) }
}

impl<Item, Err, O> Observable<Item, Err, O> for ObservableNever<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, observer: O, _scheduler: &SharedScheduler) -> Self::Unsub {
    drop(observer);
    SharedSubscription::default()
  }
}

impl<Item, Err> ObservableExt<Item, Err> for ObservableNever<Item, Err> {}

/// Creates an observable that immediately signals the given error.
///
/// This is also the idiomatic carrier for faults of element-to-stream
/// mapping functions: a `flat_map` closure that cannot produce its inner
/// stream returns `throw(err)`, and the merge multiplexer handles it exactly
/// like any other inner-stream error.
pub fn throw<Item, Err>(err: Err) -> ObservableThrow<Item, Err> {
  ObservableThrow(err, PhantomData)
}

pub struct ObservableThrow<Item, Err>(Err, PhantomData<Item>);

impl<Item, Err: Clone> Clone for ObservableThrow<Item, Err> {
  fn clone(&self) -> Self { ObservableThrow(self.0.clone(), PhantomData) }
}

impl<Item, Err, O> Observable<Item, Err, O> for ObservableThrow<Item, Err>
where
  O: Observer<Item, Err>,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, observer: O, _scheduler: &SharedScheduler) -> Self::Unsub {
    observer.error(self.0);
    SharedSubscription::default()
  }
}

impl<Item, Err> ObservableExt<Item, Err> for ObservableThrow<Item, Err> {}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::test_util::{collect, collector};

  #[tokio::test]
  async fn empty_completes_without_values() {
    let (values, result) =
      collect::<_, i32, std::convert::Infallible>(observable::empty::<i32>()).await;
    assert!(values.is_empty());
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn never_stays_silent() {
    let (observer, values, mut done) = collector::<i32, std::convert::Infallible>();
    let scheduler = default_scheduler();
    let _subscription =
      observable::never::<i32, std::convert::Infallible>().subscribe_with(observer, &scheduler);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(values.lock().unwrap().is_empty());
    assert!(done.try_recv().map_or(true, |t| t.is_none()));
  }

  #[tokio::test]
  async fn throw_signals_the_error() {
    let (values, result) = collect::<_, i32, &str>(observable::throw("boom")).await;
    assert!(values.is_empty());
    assert_eq!(result, Err("boom"));
  }
}
