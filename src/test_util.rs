//! Shared observers for unit tests.

use std::sync::{Arc, Mutex};

use futures::channel::oneshot;

use crate::ack::{self, AckFuture};
use crate::prelude::*;

/// Collects every value and reports the terminal signal through a oneshot.
pub struct CollectObserver<Item, Err> {
  values: Arc<Mutex<Vec<Item>>>,
  done: oneshot::Sender<Result<(), Err>>,
}

impl<Item, Err> Observer<Item, Err> for CollectObserver<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) -> AckFuture {
    self.values.lock().unwrap().push(value);
    ack::cont()
  }

  fn error(self, err: Err) { let _ = self.done.send(Err(err)); }

  fn complete(self) { let _ = self.done.send(Ok(())); }
}

pub fn collector<Item, Err>() -> (
  CollectObserver<Item, Err>,
  Arc<Mutex<Vec<Item>>>,
  oneshot::Receiver<Result<(), Err>>,
) {
  let values = Arc::new(Mutex::new(Vec::new()));
  let (done, rx) = oneshot::channel();
  (
    CollectObserver { values: values.clone(), done },
    values,
    rx,
  )
}

/// Subscribes on the default scheduler and waits for the terminal signal.
pub async fn collect<S, Item, Err>(source: S) -> (Vec<Item>, Result<(), Err>)
where
  S: Observable<Item, Err, CollectObserver<Item, Err>>,
  Item: Send + 'static,
  Err: Send + 'static,
{
  let (observer, values, done) = collector();
  let scheduler = default_scheduler();
  let _subscription = source.actual_subscribe(observer, &scheduler);
  let result = done.await.expect("stream dropped without a terminal signal");
  let values = std::mem::take(&mut *values.lock().unwrap());
  (values, result)
}

/// Acknowledges `limit` values with `Continue`, then answers `Stop`.
pub struct StopAfterObserver<Item> {
  values: Arc<Mutex<Vec<Item>>>,
  remaining: usize,
}

impl<Item> StopAfterObserver<Item> {
  pub fn new(limit: usize, values: Arc<Mutex<Vec<Item>>>) -> Self {
    StopAfterObserver { values, remaining: limit }
  }
}

impl<Item, Err> Observer<Item, Err> for StopAfterObserver<Item>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) -> AckFuture {
    self.values.lock().unwrap().push(value);
    self.remaining -= 1;
    if self.remaining == 0 {
      ack::stop()
    } else {
      ack::cont()
    }
  }

  fn error(self, _err: Err) {}

  fn complete(self) {}
}
