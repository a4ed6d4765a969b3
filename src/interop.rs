//! Boundary contract for bridging to request(n)-driven publish/subscribe
//! protocols (Reactive Streams and friends).
//!
//! This module deliberately contains traits only: the adapters themselves
//! live outside the core. What the core guarantees — and what makes the
//! translation possible at all — is that no producer in this crate ever
//! delivers an event without having first observed the resolved
//! acknowledgment of the previous one. An adapter can therefore implement
//! demand-based flow control transparently:
//!
//! * `request(n)` from a request-driven subscriber translates into resolving
//!   the next `n` pending acknowledgments with
//!   [`Ack::Continue`](crate::ack::Ack::Continue), one per delivered value;
//! * a cancel from the subscriber resolves the pending acknowledgment with
//!   [`Ack::Stop`](crate::ack::Ack::Stop) and unsubscribes;
//! * `error` / `complete` translate one-to-one in both directions.
//!
//! In the other direction, an [`Observer`](crate::observer::Observer)
//! wrapped as a request-driven subscriber simply issues `request(1)` after
//! each acknowledgment it resolves with `Continue`.

/// The request-driven counterpart of a subscription handle.
pub trait RequestSubscription: Send {
  /// Signals demand for `n` more elements. May be called from any thread;
  /// outstanding demand is additive.
  fn request(&mut self, n: u64);

  /// Cancels the upstream. Idempotent, like
  /// [`SubscriptionLike::unsubscribe`](crate::subscription::SubscriptionLike::unsubscribe).
  fn cancel(&mut self);
}

/// The request-driven counterpart of an [`Observer`](crate::observer::Observer).
///
/// The producer must deliver at most as many `on_next` calls as demand was
/// requested, never concurrently, and at most one terminal signal.
pub trait StreamSubscriber<Item, Err> {
  /// Receives the subscription handle before any other call.
  fn on_subscribe<S: RequestSubscription + 'static>(&mut self, subscription: S);

  fn on_next(&mut self, value: Item);

  fn on_error(self, err: Err);

  fn on_complete(self);
}

/// A source that can feed a request-driven subscriber.
pub trait StreamPublisher<Item, Err> {
  fn subscribe_stream<S>(self, subscriber: S)
  where
    S: StreamSubscriber<Item, Err> + Send + 'static;
}
