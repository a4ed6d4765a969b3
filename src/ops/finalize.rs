use std::sync::{Arc, Mutex};

use futures::FutureExt;

use crate::prelude::*;

/// Runs a callback exactly once when the stream ends, however it ends:
/// completion, error, a `Stop` acknowledgment from the consumer, or
/// cancellation of the subscription. The one probe that observes every
/// teardown path.
pub struct FinalizeOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

type SharedCallback<F> = Arc<Mutex<Option<F>>>;

fn call_once<F: FnOnce()>(callback: &SharedCallback<F>) {
  let func = callback.lock().unwrap().take();
  if let Some(func) = func {
    func();
  }
}

impl<Item, Err, O, S, F> Observable<Item, Err, O> for FinalizeOp<S, F>
where
  S: Observable<Item, Err, FinalizeObserver<O, F>>,
  O: Observer<Item, Err> + Send + 'static,
  F: FnOnce() + Send + 'static,
{
  type Unsub = FinalizeSubscription<S::Unsub, F>;

  fn actual_subscribe(self, observer: O, scheduler: &SharedScheduler) -> Self::Unsub {
    let callback = Arc::new(Mutex::new(Some(self.func)));
    let inner = self.source.actual_subscribe(
      FinalizeObserver { observer, callback: callback.clone() },
      scheduler,
    );
    FinalizeSubscription { inner, callback }
  }
}

impl<Item, Err, S, F> ObservableExt<Item, Err> for FinalizeOp<S, F> where
  S: ObservableExt<Item, Err>
{
}

pub struct FinalizeObserver<O, F> {
  observer: O,
  callback: SharedCallback<F>,
}

impl<Item, Err, O, F> Observer<Item, Err> for FinalizeObserver<O, F>
where
  O: Observer<Item, Err> + Send + 'static,
  F: FnOnce() + Send + 'static,
{
  fn next(&mut self, value: Item) -> AckFuture {
    let callback = self.callback.clone();
    let acknowledged = self.observer.next(value);
    async move {
      let ack = acknowledged.await;
      if ack.is_stop() {
        call_once(&callback);
      }
      ack
    }
    .boxed()
  }

  fn error(self, err: Err) {
    self.observer.error(err);
    call_once(&self.callback);
  }

  fn complete(self) {
    self.observer.complete();
    call_once(&self.callback);
  }
}

pub struct FinalizeSubscription<U, F> {
  inner: U,
  callback: SharedCallback<F>,
}

impl<U, F> SubscriptionLike for FinalizeSubscription<U, F>
where
  U: SubscriptionLike,
  F: FnOnce(),
{
  fn unsubscribe(&mut self) {
    self.inner.unsubscribe();
    call_once(&self.callback);
  }

  fn is_closed(&self) -> bool { self.inner.is_closed() }
}

#[cfg(test)]
mod test {
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  use crate::prelude::*;
  use crate::test_util::collect;

  #[tokio::test]
  async fn fires_once_on_completion() {
    let calls = Arc::new(AtomicUsize::new(0));
    let probe = calls.clone();
    let (_, result) = collect::<_, i32, std::convert::Infallible>(
      observable::from_iter(0..10).finalize(move || {
        probe.fetch_add(1, Ordering::SeqCst);
      }),
    )
    .await;
    assert!(result.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn fires_on_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let probe = calls.clone();
    let (_, result) = collect::<_, i32, &str>(observable::throw("oops").finalize(move || {
      probe.fetch_add(1, Ordering::SeqCst);
    }))
    .await;
    assert_eq!(result, Err("oops"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn fires_on_unsubscribe_only_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let probe = calls.clone();
    let scheduler = default_scheduler();
    let (observer, _, _done) = crate::test_util::collector::<u64, std::convert::Infallible>();
    let mut subscription = observable::from_iter(0..u64::MAX)
      .finalize(move || {
        probe.fetch_add(1, Ordering::SeqCst);
      })
      .subscribe_with(observer, &scheduler);
    subscription.unsubscribe();
    subscription.unsubscribe();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
