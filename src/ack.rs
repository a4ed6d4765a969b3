//! The acknowledgment protocol: the unit of backpressure.
//!
//! Every `next` call on an [`Observer`](crate::observer::Observer) answers
//! with an [`AckFuture`]. A producer must await that future before emitting
//! the following event, and must stop emitting for good once it resolves to
//! [`Ack::Stop`].

use futures::future::{self, BoxFuture, FutureExt};

/// The signal a consumer returns after handling one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ack {
  /// The consumer is ready for the next event.
  Continue,
  /// The consumer is done. No further event, error or completion may be
  /// delivered to it.
  Stop,
}

impl Ack {
  #[inline]
  pub fn is_stop(&self) -> bool { matches!(self, Ack::Stop) }
}

/// Asynchronously resolved acknowledgment of a single `next` call.
///
/// Resolution may happen on another task or thread; producers must not
/// assume it is synchronous.
pub type AckFuture = BoxFuture<'static, Ack>;

/// An already resolved `Continue` acknowledgment.
#[inline]
pub fn cont() -> AckFuture { future::ready(Ack::Continue).boxed() }

/// An already resolved `Stop` acknowledgment.
#[inline]
pub fn stop() -> AckFuture { future::ready(Ack::Stop).boxed() }

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn resolved_helpers() {
    assert_eq!(futures::executor::block_on(cont()), Ack::Continue);
    assert_eq!(futures::executor::block_on(stop()), Ack::Stop);
    assert!(Ack::Stop.is_stop());
    assert!(!Ack::Continue.is_stop());
  }
}
