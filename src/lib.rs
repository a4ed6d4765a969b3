//! # rxflow: ack-driven asynchronous Observables
//!
//! A push-based event-stream abstraction with cooperative backpressure:
//! every value delivered to an [`Observer`] is answered with an
//! asynchronous [`Ack`], and producers suspend until that acknowledgment
//! resolves. The centerpiece is the [`merge_all`](ObservableExt::merge_all)
//! multiplexer, which flattens a stream of streams by running every inner
//! stream concurrently and serializing their emissions into one downstream
//! observer.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxflow::prelude::*;
//!
//! let (tx, rx) = std::sync::mpsc::channel();
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .finalize(move || tx.send(()).unwrap())
//!   .subscribe(|v| println!("Value: {}", v));
//! rx.recv().unwrap();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | The core trait defining stream sources |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Ack`] | The per-event backpressure signal, resolved asynchronously |
//! | [`SubscriptionLike`] | Handle to cancel an active subscription |
//! | [`SharedScheduler`] | The task runner subscriptions execute on |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): run subscriptions on a `futures`
//!   thread pool
//! - **`tokio-scheduler`**: run subscriptions on the ambient tokio runtime
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Ack`]: ack::Ack
//! [`SubscriptionLike`]: subscription::SubscriptionLike
//! [`SharedScheduler`]: scheduler::SharedScheduler

pub mod ack;
pub mod interop;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod subscription;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export the prelude module
pub use prelude::*;
