//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::ack::{Ack, AckFuture};
// Creation/Factories
pub use crate::observable::{self, BoxObservable, Observable, ObservableExt};
// Observer traits
pub use crate::observer::{BoxObserver, DynObserver, FnMutObserver, Observer};
// Operators
pub use crate::ops::{
  filter::FilterOp, finalize::FinalizeOp, map::MapOp, merge_all::MergeAllOp, take::TakeOp,
};
// Scheduler
#[cfg(any(feature = "futures-scheduler", feature = "tokio-scheduler"))]
pub use crate::scheduler::default_scheduler;
pub use crate::scheduler::{SharedScheduler, TaskRunner};
// Subscription
pub use crate::subscription::{SharedSubscription, SubscriptionGuard, SubscriptionLike};
