//! Observer trait and implementations
//!
//! The Observer is the sequential sink of a stream. It receives values
//! through `next`, answering each one with an asynchronous [`AckFuture`],
//! and at most one terminal signal through `error` or `complete`.

use std::convert::Infallible;

use crate::ack::{self, AckFuture};

/// The consumer side of a stream.
///
/// The event grammar is `next* (complete | error)?`. The producer driving an
/// observer must await each `next` acknowledgment before invoking the
/// observer again, must stop for good once an acknowledgment resolves to
/// [`Ack::Stop`](crate::ack::Ack::Stop), and must deliver at most one of
/// `error` / `complete` — never both, and never concurrently with a pending
/// `next`.
///
/// Terminal methods consume the observer, so the type system itself rules
/// out events after a terminal signal.
pub trait Observer<Item, Err> {
  /// Receives the next value and returns the acknowledgment the producer
  /// has to await before emitting again.
  fn next(&mut self, value: Item) -> AckFuture;

  /// Receives the failure that ends this stream.
  fn error(self, err: Err);

  /// Receives the successful end of this stream.
  fn complete(self);
}

/// Object-safe mirror of [`Observer`], enabling `Box<dyn DynObserver>`.
///
/// `Observer` itself is not object safe because its terminal methods take
/// `self` by value; this trait adapts them for vtables.
pub trait DynObserver<Item, Err> {
  fn dyn_next(&mut self, value: Item) -> AckFuture;
  fn dyn_error(self: Box<Self>, err: Err);
  fn dyn_complete(self: Box<Self>);
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn dyn_next(&mut self, value: Item) -> AckFuture { self.next(value) }
  fn dyn_error(self: Box<Self>, err: Err) { (*self).error(err) }
  fn dyn_complete(self: Box<Self>) { (*self).complete() }
}

/// Type-erased observer.
pub type BoxObserver<Item, Err> = Box<dyn DynObserver<Item, Err> + Send>;

impl<Item, Err> Observer<Item, Err> for BoxObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) -> AckFuture { (**self).dyn_next(value) }

  #[inline]
  fn error(self, err: Err) { self.dyn_error(err) }

  #[inline]
  fn complete(self) { self.dyn_complete() }
}

/// Blanket observer adapter for closures.
///
/// This enables the ergonomic subscription syntax
/// `observable.subscribe(|v| println!("{v}"))`. The closure becomes the
/// `next` handler, every event is acknowledged with `Continue`, and
/// completion is ignored.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<F, Item> Observer<Item, Infallible> for FnMutObserver<F>
where
  F: FnMut(Item),
{
  #[inline]
  fn next(&mut self, value: Item) -> AckFuture {
    (self.0)(value);
    ack::cont()
  }

  #[inline]
  fn error(self, _err: Infallible) {}

  #[inline]
  fn complete(self) {}
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ack::Ack;
  use futures::executor::block_on;

  struct TestObserver {
    values: Vec<i32>,
  }

  impl Observer<i32, ()> for TestObserver {
    fn next(&mut self, value: i32) -> AckFuture {
      self.values.push(value);
      ack::cont()
    }

    fn error(self, _: ()) {}

    fn complete(self) {}
  }

  #[test]
  fn observer_receives_values() {
    let mut observer = TestObserver { values: vec![] };
    assert_eq!(block_on(observer.next(1)), Ack::Continue);
    assert_eq!(block_on(observer.next(2)), Ack::Continue);
    assert_eq!(observer.values, vec![1, 2]);
  }

  #[test]
  fn closure_as_observer() {
    let mut count = 0;
    {
      let mut observer = FnMutObserver(|v: i32| count += v);
      block_on(observer.next(10));
      block_on(observer.next(20));
    }
    assert_eq!(count, 30);
  }

  #[test]
  fn boxed_observer_forwards() {
    let mut boxed: BoxObserver<i32, ()> = Box::new(TestObserver { values: vec![] });
    block_on(boxed.next(7));
    boxed.complete();
  }
}
