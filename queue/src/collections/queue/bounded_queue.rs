use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::collections::{QueueError, RingBuffer, SyncQueueBase, SyncQueueReader, SyncQueueWriter};
use crate::concurrent::CancellationToken;
use crate::{ConfigOption, QueueConfig, WakePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Condition {
  NotFull,
  NotEmpty,
}

impl Condition {
  fn opposite(self) -> Self {
    match self {
      Condition::NotFull => Condition::NotEmpty,
      Condition::NotEmpty => Condition::NotFull,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitOutcome {
  Cancelled,
  TimedOut,
}

struct State<T> {
  buffer: Mutex<RingBuffer<T>>,
  not_full: Condvar,
  not_empty: Condvar,
  wake_policy: WakePolicy,
  name: String,
}

impl<T> State<T> {
  fn condvar(&self, condition: Condition) -> &Condvar {
    match condition {
      Condition::NotFull => &self.not_full,
      Condition::NotEmpty => &self.not_empty,
    }
  }

  fn signal(&self, condition: Condition) {
    let condvar = self.condvar(condition);
    match self.wake_policy {
      WakePolicy::Signal => {
        condvar.notify_one();
      }
      WakePolicy::Broadcast => {
        condvar.notify_all();
      }
    }
  }
}

/// A fixed-capacity FIFO queue shared between producer and consumer threads.<br/>
/// 生産者スレッドと消費者スレッドで共有する固定容量の FIFO キュー。
///
/// `put` blocks while the queue is full and `get` blocks while it is empty. A single lock guards
/// the ring buffer; producers wait on a "not full" condition and consumers on a "not empty" condition,
/// re-checking it after every wakeup. Clones share the same queue.
///
/// There is no fairness guarantee: when several threads wait on the same condition, any of them
/// may be the one that proceeds next. How many waiters each operation wakes is set by [`WakePolicy`].
///
/// # Example
///
/// ```
/// use std::thread;
///
/// use nexus_bounded_queue_rs::collections::BoundedQueue;
///
/// let queue = BoundedQueue::new(2).unwrap();
/// let producer = {
///   let queue = queue.clone();
///   thread::spawn(move || {
///     for i in 0..10 {
///       queue.put(i).unwrap();
///     }
///   })
/// };
///
/// let received = (0..10).map(|_| queue.get().unwrap()).collect::<Vec<_>>();
/// producer.join().unwrap();
/// assert_eq!(received, (0..10).collect::<Vec<_>>());
/// ```
pub struct BoundedQueue<T> {
  state: Arc<State<T>>,
}

impl<T> Clone for BoundedQueue<T> {
  fn clone(&self) -> Self {
    Self {
      state: Arc::clone(&self.state),
    }
  }
}

impl<T> Debug for BoundedQueue<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let buffer = self.state.buffer.lock();
    f.debug_struct("BoundedQueue")
      .field("name", &self.state.name)
      .field("capacity", &buffer.fixed_capacity())
      .field("size", &buffer.count())
      .field("wake_policy", &self.state.wake_policy)
      .finish()
  }
}

impl<T> BoundedQueue<T> {
  /// Creates a queue holding at most `capacity` elements.
  ///
  /// # Errors
  /// Returns `QueueError::InvalidArgument` if `capacity` is zero.
  pub fn new(capacity: usize) -> Result<Self, QueueError<T>> {
    Self::from_config(QueueConfig::from([ConfigOption::with_capacity(capacity)]))
  }

  pub fn from_config(config: QueueConfig) -> Result<Self, QueueError<T>> {
    let buffer = RingBuffer::new(config.capacity)?;
    tracing::debug!(
      "BoundedQueue::from_config: name = {}, capacity = {}, wake_policy = {:?}",
      config.name,
      config.capacity,
      config.wake_policy
    );
    Ok(Self {
      state: Arc::new(State {
        buffer: Mutex::new(buffer),
        not_full: Condvar::new(),
        not_empty: Condvar::new(),
        wake_policy: config.wake_policy,
        name: config.name,
      }),
    })
  }

  pub fn name(&self) -> &str {
    &self.state.name
  }

  pub fn wake_policy(&self) -> WakePolicy {
    self.state.wake_policy
  }

  /// Returns the number of buffered elements.
  ///
  /// The value is a snapshot and may be stale as soon as it is returned.
  pub fn size(&self) -> usize {
    self.state.buffer.lock().count()
  }

  pub fn capacity(&self) -> usize {
    self.state.buffer.lock().fixed_capacity()
  }

  pub fn remaining_capacity(&self) -> usize {
    self.state.buffer.lock().remaining()
  }

  pub fn is_empty(&self) -> bool {
    !self.state.buffer.lock().has_items()
  }

  pub fn is_full(&self) -> bool {
    !self.state.buffer.lock().has_room()
  }

  /// Inserts `element` only if a slot is free right now.
  ///
  /// # Errors
  /// Returns `QueueError::OfferError(element)` if the queue is full.
  pub fn try_put(&self, element: T) -> Result<(), QueueError<T>> {
    let mut buffer = self.state.buffer.lock();
    buffer.push(element).map_err(QueueError::OfferError)?;
    self.state.signal(Condition::NotEmpty);
    Ok(())
  }

  /// Removes the oldest element if there is one, without waiting.
  pub fn try_get(&self) -> Option<T> {
    let mut buffer = self.state.buffer.lock();
    let element = buffer.pop()?;
    self.state.signal(Condition::NotFull);
    Some(element)
  }

  #[cfg(test)]
  pub(crate) fn indices(&self) -> (usize, usize) {
    self.state.buffer.lock().indices()
  }
}

impl<T: Send + 'static> BoundedQueue<T> {
  /// Inserts `element` at the tail, waiting while the queue is full.
  ///
  /// Without a cancellation source this only returns once the element is enqueued.
  pub fn put(&self, element: T) -> Result<(), QueueError<T>> {
    self.put_inner(element, None, None)
  }

  /// Inserts `element`, waiting while the queue is full until `token` is cancelled.
  ///
  /// # Errors
  /// Returns `QueueError::CancelledError(Some(element))` if the token is cancelled before a slot
  /// becomes free. The queue is left untouched.
  pub fn put_with_cancel(&self, element: T, token: &CancellationToken) -> Result<(), QueueError<T>> {
    self.put_inner(element, None, Some(token))
  }

  /// Inserts `element`, waiting at most `timeout` for a free slot.
  ///
  /// # Errors
  /// Returns `QueueError::TimeoutError(Some(element))` when the timeout expires.
  pub fn put_timeout(&self, element: T, timeout: Duration) -> Result<(), QueueError<T>> {
    self.put_inner(element, Instant::now().checked_add(timeout), None)
  }

  /// Removes and returns the oldest element, waiting while the queue is empty.
  pub fn get(&self) -> Result<T, QueueError<T>> {
    self.get_inner(None, None)
  }

  /// Removes the oldest element, waiting while the queue is empty until `token` is cancelled.
  ///
  /// # Errors
  /// Returns `QueueError::CancelledError(None)` if the token is cancelled before an element arrives.
  pub fn get_with_cancel(&self, token: &CancellationToken) -> Result<T, QueueError<T>> {
    self.get_inner(None, Some(token))
  }

  /// Removes the oldest element, waiting at most `timeout` for one to arrive.
  ///
  /// # Errors
  /// Returns `QueueError::TimeoutError(None)` when the timeout expires.
  pub fn get_timeout(&self, timeout: Duration) -> Result<T, QueueError<T>> {
    self.get_inner(Instant::now().checked_add(timeout), None)
  }

  fn put_inner(
    &self,
    element: T,
    deadline: Option<Instant>,
    token: Option<&CancellationToken>,
  ) -> Result<(), QueueError<T>> {
    let mut pending = Some(element);
    let result = self.wait_for(Condition::NotFull, deadline, token, |buffer| {
      let element = pending.take()?;
      match buffer.push(element) {
        Ok(()) => Some(()),
        Err(element) => {
          pending = Some(element);
          None
        }
      }
    });
    match result {
      Ok(()) => Ok(()),
      Err(WaitOutcome::Cancelled) => {
        tracing::debug!("BoundedQueue::put: cancelled while waiting, name = {}", self.state.name);
        Err(QueueError::CancelledError(pending))
      }
      Err(WaitOutcome::TimedOut) => {
        tracing::debug!("BoundedQueue::put: timed out, name = {}", self.state.name);
        Err(QueueError::TimeoutError(pending))
      }
    }
  }

  fn get_inner(&self, deadline: Option<Instant>, token: Option<&CancellationToken>) -> Result<T, QueueError<T>> {
    match self.wait_for(Condition::NotEmpty, deadline, token, |buffer| buffer.pop()) {
      Ok(element) => Ok(element),
      Err(WaitOutcome::Cancelled) => {
        tracing::debug!("BoundedQueue::get: cancelled while waiting, name = {}", self.state.name);
        Err(QueueError::CancelledError(None))
      }
      Err(WaitOutcome::TimedOut) => {
        tracing::debug!("BoundedQueue::get: timed out, name = {}", self.state.name);
        Err(QueueError::TimeoutError(None))
      }
    }
  }

  /// Runs `attempt` under the lock until it succeeds, waiting on `condition` in between.
  ///
  /// `attempt` must only mutate the buffer when it returns `Some`. It runs after every wakeup, so a
  /// waiter that is woken while the condition holds always consumes it before leaving.
  fn wait_for<R>(
    &self,
    condition: Condition,
    deadline: Option<Instant>,
    token: Option<&CancellationToken>,
    mut attempt: impl FnMut(&mut RingBuffer<T>) -> Option<R>,
  ) -> Result<R, WaitOutcome> {
    let mut buffer = self.state.buffer.lock();
    if let Some(result) = attempt(&mut *buffer) {
      self.state.signal(condition.opposite());
      return Ok(result);
    }

    let _registration = match token {
      Some(token) => Some(token.register(self.canceller()).ok_or(WaitOutcome::Cancelled)?),
      None => None,
    };
    let condvar = self.state.condvar(condition);
    tracing::trace!(
      "BoundedQueue::wait_for: waiting for {:?}, name = {}, size = {}",
      condition,
      self.state.name,
      buffer.count()
    );

    loop {
      if token.is_some_and(CancellationToken::is_cancelled) {
        return Err(WaitOutcome::Cancelled);
      }
      let timed_out = match deadline {
        Some(deadline) => condvar.wait_until(&mut buffer, deadline).timed_out(),
        None => {
          condvar.wait(&mut buffer);
          false
        }
      };
      if let Some(result) = attempt(&mut *buffer) {
        self.state.signal(condition.opposite());
        return Ok(result);
      }
      if timed_out {
        return Err(WaitOutcome::TimedOut);
      }
    }
  }

  fn canceller(&self) -> Arc<dyn Fn() + Send + Sync> {
    let state = Arc::downgrade(&self.state);
    Arc::new(move || {
      if let Some(state) = state.upgrade() {
        // Taking the lock orders this wakeup after the waiter has started waiting.
        let _buffer = state.buffer.lock();
        state.not_full.notify_all();
        state.not_empty.notify_all();
      }
    })
  }
}

impl<T> SyncQueueBase<T> for BoundedQueue<T> {
  fn len(&self) -> usize {
    self.size()
  }

  fn capacity(&self) -> usize {
    BoundedQueue::capacity(self)
  }
}

impl<T> SyncQueueWriter<T> for BoundedQueue<T> {
  fn offer(&mut self, element: T) -> Result<(), QueueError<T>> {
    self.try_put(element)
  }
}

impl<T> SyncQueueReader<T> for BoundedQueue<T> {
  fn poll(&mut self) -> Result<Option<T>, QueueError<T>> {
    Ok(self.try_get())
  }

  fn clean_up(&mut self) {
    let mut buffer = self.state.buffer.lock();
    while buffer.pop().is_some() {}
    self.state.not_full.notify_all();
  }
}
