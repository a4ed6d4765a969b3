//! The merge multiplexer.
//!
//! Subscribes to a source of inner observables, subscribes every inner
//! observable concurrently (up to a configurable cap), and serializes all of
//! their emissions into the single downstream observer. Terminal rules:
//!
//! * completion fires exactly when the source has completed **and** no inner
//!   subscription is still active;
//! * the first error from the source or any inner stream wins, is delivered
//!   once, and every other live subscription is cancelled, not drained;
//! * a `Stop` acknowledgment from downstream, or cancelling the returned
//!   subscription, cancels the source and every inner stream without any
//!   further downstream signal.
//!
//! All three paths race through one atomic check-and-set guard, so exactly
//! one terminal signal ever reaches the downstream observer, and it is the
//! last call the observer sees.

use std::{
  collections::{HashMap, HashSet, VecDeque},
  marker::PhantomData,
  sync::{
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    Arc, Mutex,
  },
};

use futures::{lock::Mutex as AsyncMutex, FutureExt};

use crate::ack::{self, Ack};
use crate::prelude::*;
use crate::subscription::BoxSubscription;

/// Arena id reserved for the source subscription; inner streams get ids from
/// `next_id`.
const SOURCE_ID: u64 = 0;

pub struct MergeAllOp<S, C> {
  pub(crate) source: S,
  pub(crate) concurrent: usize,
  pub(crate) _p: PhantomData<C>,
}

impl<Item, Err, O, S, C> Observable<Item, Err, O> for MergeAllOp<S, C>
where
  O: Observer<Item, Err> + Send + 'static,
  S: Observable<C, Err, MergeSourceObserver<O, C, Item>>,
  S::Unsub: Send + Sync + 'static,
  C: Observable<Item, Err, MergeInnerObserver<O, C>> + Send + 'static,
  C::Unsub: Send + Sync + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Unsub = MergeSubscription<O, C>;

  fn actual_subscribe(self, observer: O, scheduler: &SharedScheduler) -> Self::Unsub {
    let state = Arc::new(MergeState {
      downstream: AsyncMutex::new(Some(observer)),
      // the source occupies one reserved slot until it completes or errors
      active: AtomicUsize::new(1),
      source_done: AtomicBool::new(false),
      terminated: AtomicBool::new(false),
      subscriptions: Mutex::new(SubscriptionArena::default()),
      pending: Mutex::new(PendingChildren {
        running: 0,
        queue: VecDeque::new(),
      }),
      next_id: AtomicU64::new(SOURCE_ID + 1),
      concurrent: self.concurrent.max(1),
      scheduler: scheduler.clone(),
    });
    let unsub = self
      .source
      .actual_subscribe(MergeSourceObserver { state: state.clone(), _p: PhantomData }, scheduler);
    state.register(SOURCE_ID, Box::new(unsub));
    MergeSubscription(state)
  }
}

impl<C, Item, Err, S> ObservableExt<Item, Err> for MergeAllOp<S, C>
where
  S: ObservableExt<C, Err>,
  C: ObservableExt<Item, Err>,
{
}

/// State shared by the source observer, every inner observer and the
/// downstream cancellation handle. The async mutex around the downstream
/// observer is the serializer: whoever holds it owns the one in-flight
/// downstream call, and keeps holding it until that call's acknowledgment
/// resolves, so a later call can never overtake an earlier one. Waiters are
/// woken in FIFO order, which keeps every inner stream making progress.
struct MergeState<O, C> {
  downstream: AsyncMutex<Option<O>>,
  /// Inner subscriptions not yet terminated, plus the source's reserved
  /// slot. Queued (not yet subscribed) inner streams are not counted.
  active: AtomicUsize,
  source_done: AtomicBool,
  /// The exactly-once terminal guard. Set by whichever of
  /// {error, downstream stop, natural completion, cancellation} wins the
  /// compare-and-set; every loser becomes a no-op.
  terminated: AtomicBool,
  subscriptions: Mutex<SubscriptionArena>,
  pending: Mutex<PendingChildren<C>>,
  next_id: AtomicU64,
  concurrent: usize,
  scheduler: SharedScheduler,
}

#[derive(Default)]
struct SubscriptionArena {
  closed: bool,
  live: HashMap<u64, BoxSubscription>,
  /// Ids whose terminal event raced ahead of their handle registration
  /// (synchronously completing inner streams). Their handles are dropped on
  /// arrival instead of being kept or redundantly cancelled.
  finished_early: HashSet<u64>,
}

struct PendingChildren<C> {
  /// Inner streams currently holding one of the `concurrent` slots.
  running: usize,
  queue: VecDeque<C>,
}

impl<O, C> MergeState<O, C> {
  fn register(&self, id: u64, subscription: BoxSubscription) {
    let mut arena = self.subscriptions.lock().unwrap();
    if arena.finished_early.remove(&id) {
      return;
    }
    if arena.closed {
      drop(arena);
      let mut subscription = subscription;
      subscription.unsubscribe();
    } else {
      arena.live.insert(id, subscription);
    }
  }

  /// Forgets a subscription whose owner terminated on its own, so a later
  /// sweep does not cancel it redundantly.
  fn deregister(&self, id: u64) {
    let mut arena = self.subscriptions.lock().unwrap();
    if arena.live.remove(&id).is_none() && !arena.closed {
      arena.finished_early.insert(id);
    }
  }

  /// Cancels the source and every still-active inner subscription, and
  /// drops every queued inner stream. Active streams are abandoned, not
  /// drained.
  fn sweep(&self) {
    let handles = {
      let mut arena = self.subscriptions.lock().unwrap();
      arena.closed = true;
      arena.live.drain().map(|(_, handle)| handle).collect::<Vec<_>>()
    };
    self.pending.lock().unwrap().queue.clear();
    for mut handle in handles {
      handle.unsubscribe();
    }
  }

  /// First terminal writer wins; everyone else backs off.
  fn try_terminate(&self) -> bool {
    self
      .terminated
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }
}

impl<O, C> MergeState<O, C>
where
  O: Send + 'static,
  C: Send + 'static,
{
  /// Downstream-initiated termination: no further signal is delivered, the
  /// downstream observer is simply dropped behind the serializer so any
  /// in-flight call finishes first.
  fn cancel(self: &Arc<Self>) {
    if self.try_terminate() {
      self.sweep();
      let state = self.clone();
      self.scheduler.spawn(async move {
        drop(state.downstream.lock().await.take());
      });
    }
  }
}

/// Subscribes one inner stream and files its cancellation handle in the
/// arena.
fn subscribe_inner<Item, Err, O, C>(state: &Arc<MergeState<O, C>>, inner: C)
where
  O: Observer<Item, Err> + Send + 'static,
  C: Observable<Item, Err, MergeInnerObserver<O, C>> + Send + 'static,
  C::Unsub: Send + Sync + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
{
  let id = state.next_id.fetch_add(1, Ordering::Relaxed);
  let observer = MergeInnerObserver { state: state.clone(), id };
  let unsub = inner.actual_subscribe(observer, &state.scheduler);
  state.register(id, Box::new(unsub));
}

/// The observer the multiplexer subscribes to the source: every source
/// element is an inner observable to start (or queue), never a value to
/// forward.
pub struct MergeSourceObserver<O, C, Item> {
  state: Arc<MergeState<O, C>>,
  _p: PhantomData<Item>,
}

impl<Item, Err, O, C> Observer<C, Err> for MergeSourceObserver<O, C, Item>
where
  O: Observer<Item, Err> + Send + 'static,
  C: Observable<Item, Err, MergeInnerObserver<O, C>> + Send + 'static,
  C::Unsub: Send + Sync + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, inner: C) -> AckFuture {
    let state = &self.state;
    if state.terminated.load(Ordering::Acquire) {
      // stop pulling the source and skip the new inner stream
      return ack::stop();
    }
    let mut inner = Some(inner);
    {
      let mut pending = state.pending.lock().unwrap();
      if pending.running < state.concurrent {
        pending.running += 1;
      } else if let Some(inner) = inner.take() {
        pending.queue.push_back(inner);
      }
    }
    if let Some(inner) = inner {
      state.active.fetch_add(1, Ordering::AcqRel);
      subscribe_inner(state, inner);
    }
    // source throughput is independent of inner/downstream backpressure:
    // concurrency is unbounded unless capped
    ack::cont()
  }

  fn error(self, err: Err) {
    self.state.deregister(SOURCE_ID);
    if self.state.try_terminate() {
      self.state.sweep();
      let state = self.state;
      let scheduler = state.scheduler.clone();
      scheduler.spawn(async move {
        if let Some(observer) = state.downstream.lock().await.take() {
          observer.error(err);
        }
      });
    }
  }

  fn complete(self) {
    self.state.deregister(SOURCE_ID);
    self.state.source_done.store(true, Ordering::Release);
    // release the reserved source slot; last one out completes downstream
    if self.state.active.fetch_sub(1, Ordering::AcqRel) == 1 && self.state.try_terminate() {
      self.state.sweep();
      let state = self.state;
      let scheduler = state.scheduler.clone();
      scheduler.spawn(async move {
        if let Some(observer) = state.downstream.lock().await.take() {
          observer.complete();
        }
      });
    }
  }
}

/// The observer attached to each inner stream: forwards values through the
/// serializer, and settles the combined lifecycle on terminal events.
pub struct MergeInnerObserver<O, C> {
  state: Arc<MergeState<O, C>>,
  id: u64,
}

impl<Item, Err, O, C> Observer<Item, Err> for MergeInnerObserver<O, C>
where
  O: Observer<Item, Err> + Send + 'static,
  C: Observable<Item, Err, MergeInnerObserver<O, C>> + Send + 'static,
  C::Unsub: Send + Sync + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) -> AckFuture {
    let state = self.state.clone();
    async move {
      if state.terminated.load(Ordering::Acquire) {
        return Ack::Stop;
      }
      let mut gate = state.downstream.lock().await;
      let Some(observer) = gate.as_mut() else {
        // someone terminated while we waited for our turn
        return Ack::Stop;
      };
      let ack = observer.next(value).await;
      if ack.is_stop() {
        // downstream is done: drop it before releasing the serializer so
        // nothing can be delivered after this point
        gate.take();
        drop(gate);
        if state.try_terminate() {
          state.sweep();
        }
      }
      ack
    }
    .boxed()
  }

  fn error(self, err: Err) {
    self.state.deregister(self.id);
    if self.state.try_terminate() {
      self.state.sweep();
      let state = self.state;
      let scheduler = state.scheduler.clone();
      scheduler.spawn(async move {
        if let Some(observer) = state.downstream.lock().await.take() {
          observer.error(err);
        }
      });
    }
  }

  fn complete(self) {
    let state = self.state;
    state.deregister(self.id);

    // hand this stream's concurrency slot to the next queued inner stream
    let successor = {
      let mut pending = state.pending.lock().unwrap();
      match pending.queue.pop_front() {
        Some(inner) => Some(inner),
        None => {
          pending.running -= 1;
          None
        }
      }
    };
    if let Some(inner) = successor {
      // count the successor before releasing our own slot so the active
      // count cannot dip to zero in between; subscribing goes through the
      // scheduler to keep chains of synchronously completing streams off
      // the stack
      state.active.fetch_add(1, Ordering::AcqRel);
      let spawn_state = state.clone();
      state.scheduler.spawn(async move {
        if spawn_state.terminated.load(Ordering::Acquire) {
          spawn_state.active.fetch_sub(1, Ordering::AcqRel);
        } else {
          subscribe_inner(&spawn_state, inner);
        }
      });
    }

    if state.active.fetch_sub(1, Ordering::AcqRel) == 1
      && state.source_done.load(Ordering::Acquire)
      && state.try_terminate()
    {
      state.sweep();
      let scheduler = state.scheduler.clone();
      scheduler.spawn(async move {
        if let Some(observer) = state.downstream.lock().await.take() {
          observer.complete();
        }
      });
    }
  }
}

/// Cancellation handle of a merged stream: cancelling it cancels the source
/// subscription and every active inner subscription.
pub struct MergeSubscription<O, C>(Arc<MergeState<O, C>>);

impl<O, C> Clone for MergeSubscription<O, C> {
  fn clone(&self) -> Self { MergeSubscription(self.0.clone()) }
}

impl<O, C> SubscriptionLike for MergeSubscription<O, C>
where
  O: Send + 'static,
  C: Send + 'static,
{
  fn unsubscribe(&mut self) { self.0.cancel(); }

  fn is_closed(&self) -> bool { self.0.terminated.load(Ordering::Acquire) }
}
