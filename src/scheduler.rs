//! The task-running collaborator.
//!
//! Producers do not block the subscribing thread: `actual_subscribe` hands
//! the pull loop to a [`SharedScheduler`] and returns immediately. The
//! scheduler is an opaque capability; the only assumption made about it is
//! that every submitted unit of work eventually executes.
//!
//! Which runner backs the default is a feature knob: `futures-scheduler`
//! (default) uses a process-wide `futures` thread pool, `tokio-scheduler`
//! spawns onto the ambient tokio runtime.

use std::{future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt};
#[cfg(feature = "futures-scheduler")]
use {futures::executor::ThreadPool, once_cell::sync::Lazy};

/// An object-safe spawner of independent units of work.
pub trait TaskRunner: Send + Sync {
  fn run(&self, task: BoxFuture<'static, ()>);
}

/// Cheap-to-clone handle to the task runner a subscription executes on.
#[derive(Clone)]
pub struct SharedScheduler(Arc<dyn TaskRunner>);

impl SharedScheduler {
  pub fn new<R: TaskRunner + 'static>(runner: R) -> Self { SharedScheduler(Arc::new(runner)) }

  pub fn spawn(&self, task: impl Future<Output = ()> + Send + 'static) {
    self.0.run(task.boxed());
  }

  /// A scheduler backed by its own `futures` thread pool.
  #[cfg(feature = "futures-scheduler")]
  pub fn thread_pool() -> Self {
    Self::new(ThreadPool::new().expect("create thread pool failed."))
  }

  /// A scheduler spawning onto the current tokio runtime.
  ///
  /// Panics when called outside a tokio runtime, as
  /// `tokio::runtime::Handle::current` does.
  #[cfg(feature = "tokio-scheduler")]
  pub fn tokio() -> Self { Self::new(TokioSpawner(tokio::runtime::Handle::current())) }
}

#[cfg(feature = "futures-scheduler")]
impl TaskRunner for ThreadPool {
  fn run(&self, task: BoxFuture<'static, ()>) { self.spawn_ok(task); }
}

#[cfg(feature = "tokio-scheduler")]
pub struct TokioSpawner(tokio::runtime::Handle);

#[cfg(feature = "tokio-scheduler")]
impl TaskRunner for TokioSpawner {
  fn run(&self, task: BoxFuture<'static, ()>) { self.0.spawn(task); }
}

#[cfg(feature = "futures-scheduler")]
static DEFAULT_POOL: Lazy<SharedScheduler> = Lazy::new(SharedScheduler::thread_pool);

/// The scheduler `ObservableExt::subscribe` uses when none is given
/// explicitly.
#[cfg(feature = "futures-scheduler")]
pub fn default_scheduler() -> SharedScheduler { DEFAULT_POOL.clone() }

#[cfg(all(not(feature = "futures-scheduler"), feature = "tokio-scheduler"))]
pub fn default_scheduler() -> SharedScheduler { SharedScheduler::tokio() }

#[cfg(test)]
mod test {
  use super::*;
  use futures::channel::oneshot;

  #[test]
  fn spawned_task_runs() {
    let scheduler = default_scheduler();
    let (tx, rx) = oneshot::channel();
    scheduler.spawn(async move {
      let _ = tx.send(42);
    });
    assert_eq!(futures::executor::block_on(rx), Ok(42));
  }

  #[test]
  fn clones_share_the_runner() {
    let scheduler = default_scheduler();
    let clone = scheduler.clone();
    let (tx, rx) = oneshot::channel();
    clone.spawn(async move {
      let _ = tx.send(());
    });
    assert!(futures::executor::block_on(rx).is_ok());
  }
}
