//! The source abstraction and its combinator surface.

#[cfg(any(feature = "futures-scheduler", feature = "tokio-scheduler"))]
use std::convert::Infallible;
use std::marker::PhantomData;

use crate::{
  observer::{BoxObserver, FnMutObserver, Observer},
  ops::{
    filter::FilterOp, finalize::FinalizeOp, map::MapOp, merge_all::MergeAllOp, take::TakeOp,
  },
  scheduler::SharedScheduler,
  subscription::SubscriptionLike,
};

mod boxed;
mod from_iter;
mod of;
mod trivial;

pub use boxed::BoxObservable;
pub use from_iter::{from_iter, repeat, ObservableIter};
pub use of::{of, ObservableOf};
pub use trivial::{empty, never, throw, ObservableEmpty, ObservableNever, ObservableThrow};

/// A push-based source of a sequential event stream.
///
/// Subscribing consumes the producer and starts delivery toward `observer`
/// on tasks spawned via `scheduler`; the returned handle cancels the stream.
/// Producers are cold: every subscription of a (cloned) producer drives an
/// independent event sequence.
pub trait Observable<Item, Err, O: Observer<Item, Err>> {
  type Unsub: SubscriptionLike;

  fn actual_subscribe(self, observer: O, scheduler: &SharedScheduler) -> Self::Unsub;
}

/// Combinator methods available on every observable.
///
/// The blanket `impl ObservableExt for Op {}` per producer mirrors how the
/// operator structs stay independent of any particular observer type: the
/// observer constraints only materialize in the `Observable` impls.
pub trait ObservableExt<Item, Err>: Sized {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  fn map<B, F>(self, func: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp { source: self, func, _p: PhantomData }
  }

  /// Emits only the values matching the predicate.
  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    FilterOp { source: self, predicate }
  }

  /// Emits only the first `count` values, then completes and cancels the
  /// source.
  fn take(self, count: usize) -> TakeOp<Self> {
    TakeOp { source: self, count }
  }

  /// Invokes a callback exactly once when the stream terminates for any
  /// reason: completion, error, a `Stop` acknowledgment, or cancellation.
  fn finalize<F>(self, func: F) -> FinalizeOp<Self, F>
  where
    F: FnOnce() + Send,
  {
    FinalizeOp { source: self, func }
  }

  /// Flattens a stream of streams by subscribing to at most `concurrent`
  /// inner streams at a time and multiplexing their events into one output
  /// stream. Inner streams beyond the cap are queued until a slot frees up.
  ///
  /// A cap of zero is treated as one.
  fn merge_all(self, concurrent: usize) -> MergeAllOp<Self, Item> {
    MergeAllOp {
      source: self,
      concurrent,
      _p: PhantomData,
    }
  }

  /// Flattens a stream of streams with unbounded concurrency.
  fn merge(self) -> MergeAllOp<Self, Item> { self.merge_all(usize::MAX) }

  /// Maps every element to an inner stream and merges all of them, with
  /// unbounded concurrency. `source.flat_map(f)` is exactly
  /// `source.map(f).merge()`.
  fn flat_map<C, F>(self, func: F) -> MergeAllOp<MapOp<Self, F, Item>, C>
  where
    F: FnMut(Item) -> C,
  {
    self.map(func).merge()
  }

  /// Erases the concrete producer type, so heterogeneous streams can flow
  /// through one combinator.
  fn box_it(self) -> BoxObservable<Item, Err>
  where
    Self: Observable<Item, Err, BoxObserver<Item, Err>> + Send + 'static,
    <Self as Observable<Item, Err, BoxObserver<Item, Err>>>::Unsub: Send + Sync + 'static,
  {
    BoxObservable::new(self)
  }

  /// Subscribes on an explicit scheduler with a full observer.
  fn subscribe_with<O>(
    self,
    observer: O,
    scheduler: &SharedScheduler,
  ) -> <Self as Observable<Item, Err, O>>::Unsub
  where
    Self: Observable<Item, Err, O>,
    O: Observer<Item, Err>,
  {
    self.actual_subscribe(observer, scheduler)
  }

  /// Subscribes an error-free stream with a plain closure on the default
  /// scheduler.
  #[cfg(any(feature = "futures-scheduler", feature = "tokio-scheduler"))]
  fn subscribe<N>(self, next: N) -> <Self as Observable<Item, Infallible, FnMutObserver<N>>>::Unsub
  where
    Self: Observable<Item, Infallible, FnMutObserver<N>>,
    N: FnMut(Item),
  {
    self.actual_subscribe(FnMutObserver(next), &crate::scheduler::default_scheduler())
  }
}
