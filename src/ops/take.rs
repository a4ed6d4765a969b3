use futures::FutureExt;

use crate::ack::{self, Ack};
use crate::prelude::*;

/// Emits only the first `count` values emitted by the source, completes the
/// downstream, and stops the source through a `Stop` acknowledgment.
///
/// If the source emits fewer than `count` values then all of its values are
/// emitted and completion follows the source's own completion.
pub struct TakeOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<Item, Err, O, S> Observable<Item, Err, O> for TakeOp<S>
where
  S: Observable<Item, Err, TakeObserver<O>>,
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
{
  type Unsub = S::Unsub;

  fn actual_subscribe(self, observer: O, scheduler: &SharedScheduler) -> Self::Unsub {
    self.source.actual_subscribe(
      TakeObserver {
        observer: Some(observer),
        remaining: self.count,
      },
      scheduler,
    )
  }
}

impl<Item, Err, S> ObservableExt<Item, Err> for TakeOp<S> where S: ObservableExt<Item, Err> {}

pub struct TakeObserver<O> {
  observer: Option<O>,
  remaining: usize,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err> + Send + 'static,
  Item: Send + 'static,
{
  fn next(&mut self, value: Item) -> AckFuture {
    if self.remaining == 0 {
      // take(0): the first arrival is the moment we know the source is live
      // and can be told to stop
      if let Some(observer) = self.observer.take() {
        observer.complete();
      }
      return ack::stop();
    }
    if self.remaining > 1 {
      match self.observer.as_mut() {
        Some(observer) => {
          self.remaining -= 1;
          observer.next(value)
        }
        None => ack::stop(),
      }
    } else {
      self.remaining = 0;
      match self.observer.take() {
        Some(mut observer) => async move {
          // completion must not overtake the last value's acknowledgment,
          // and must be skipped entirely if the consumer said stop
          if !observer.next(value).await.is_stop() {
            observer.complete();
          }
          Ack::Stop
        }
        .boxed(),
        None => ack::stop(),
      }
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self.observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self.observer {
      observer.complete();
    }
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::test_util::collect;

  #[tokio::test]
  async fn base_function() {
    let (values, result) =
      collect::<_, i32, std::convert::Infallible>(observable::from_iter(0..100).take(5)).await;
    assert_eq!(values, vec![0, 1, 2, 3, 4]);
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn take_stops_an_endless_source() {
    let (values, result) =
      collect::<_, u64, std::convert::Infallible>(observable::from_iter(0..u64::MAX).take(3))
        .await;
    assert_eq!(values, vec![0, 1, 2]);
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn take_more_than_available() {
    let (values, result) =
      collect::<_, i32, std::convert::Infallible>(observable::from_iter(0..3).take(10)).await;
    assert_eq!(values, vec![0, 1, 2]);
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn take_zero_of_empty_source() {
    let (values, result) =
      collect::<_, i32, std::convert::Infallible>(observable::from_iter(0..0).take(0)).await;
    assert!(values.is_empty());
    assert!(result.is_ok());
  }
}
