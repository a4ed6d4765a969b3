use crate::prelude::*;
use std::convert::Infallible;

/// Creates an observable that produces values from an iterator.
///
/// The pull loop runs as a task on the subscribe-time scheduler, awaits the
/// acknowledgment of every value before emitting the next one, and completes
/// when the iterator is exhausted. Never emits an error.
///
/// # Arguments
///
/// * `iter` - An iterator to get all the values from.
///
/// # Examples
///
/// ```
/// use rxflow::prelude::*;
///
/// let (tx, rx) = std::sync::mpsc::channel();
/// observable::from_iter(0..10)
///   .finalize(move || tx.send(()).unwrap())
///   .subscribe(|v| println!("{},", v));
/// rx.recv().unwrap();
/// ```
pub fn from_iter<Iter>(iter: Iter) -> ObservableIter<Iter>
where
  Iter: IntoIterator,
{
  ObservableIter(iter)
}

#[derive(Clone)]
pub struct ObservableIter<Iter>(Iter);

impl<Item, Err, O, Iter> Observable<Item, Err, O> for ObservableIter<Iter>
where
  Iter: IntoIterator<Item = Item> + Send + 'static,
  Iter::IntoIter: Send,
  Item: Send,
  O: Observer<Item, Err> + Send + 'static,
{
  type Unsub = SharedSubscription;

  fn actual_subscribe(self, mut observer: O, scheduler: &SharedScheduler) -> Self::Unsub {
    let subscription = SharedSubscription::default();
    let handle = subscription.clone();
    scheduler.spawn(async move {
      for value in self.0 {
        if handle.is_closed() {
          return;
        }
        if observer.next(value).await.is_stop() {
          return;
        }
      }
      if !handle.is_closed() {
        observer.complete();
      }
    });
    subscription
  }
}

impl<Iter> ObservableExt<Iter::Item, Infallible> for ObservableIter<Iter> where Iter: IntoIterator {}

/// Creates an observable producing the same value repeated N times.
///
/// # Arguments
///
/// * `v` - A value to emit.
/// * `n` - A number of times to repeat it.
pub fn repeat<Item>(v: Item, n: usize) -> ObservableIter<std::iter::Take<std::iter::Repeat<Item>>>
where
  Item: Clone,
{
  from_iter(std::iter::repeat(v).take(n))
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use crate::test_util::collect;

  #[tokio::test]
  async fn from_range() {
    let (values, result) =
      collect::<_, i32, std::convert::Infallible>(observable::from_iter(0..100)).await;
    assert_eq!(values, (0..100).collect::<Vec<_>>());
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn from_vec() {
    let (values, result) =
      collect::<_, i32, std::convert::Infallible>(observable::from_iter(vec![0; 100])).await;
    assert_eq!(values.len(), 100);
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn repeat_three_times() {
    let (values, result) =
      collect::<_, i32, std::convert::Infallible>(observable::repeat(123, 3)).await;
    assert_eq!(values, vec![123, 123, 123]);
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn repeat_zero_times() {
    let (values, result) =
      collect::<_, i32, std::convert::Infallible>(observable::repeat(123, 0)).await;
    assert!(values.is_empty());
    assert!(result.is_ok());
  }

  #[tokio::test]
  async fn stop_ack_halts_the_loop() {
    use crate::test_util::StopAfterObserver;
    use std::sync::{Arc, Mutex};

    let values = Arc::new(Mutex::new(Vec::new()));
    let scheduler = default_scheduler();
    observable::from_iter(0..u64::MAX)
      .subscribe_with(StopAfterObserver::new(3, values.clone()), &scheduler);

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    loop {
      if values.lock().unwrap().len() == 3 {
        break;
      }
      assert!(std::time::Instant::now() < deadline, "producer never emitted");
      tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(&*values.lock().unwrap(), &[0, 1, 2]);
  }

  #[tokio::test]
  async fn unsubscribe_stops_emission_without_terminal() {
    let (observer, values, mut done) = crate::test_util::collector::<u64, std::convert::Infallible>();
    let scheduler = default_scheduler();
    let mut subscription =
      observable::from_iter(0..u64::MAX).subscribe_with(observer, &scheduler);
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    subscription.unsubscribe();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let len = values.lock().unwrap().len();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(values.lock().unwrap().len(), len);
    // no terminal signal: the stream was cancelled, not completed
    assert!(done.try_recv().map_or(true, |t| t.is_none()));
  }
}
