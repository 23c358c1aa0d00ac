#[cfg(test)]
mod tests;

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_condvar::Condvar;

use crate::collections::element::Element;
use crate::collections::{
  BlockingQueueBase, BlockingQueueReader, BlockingQueueWriter, QueueBase, QueueError, QueueReader, QueueWriter,
  RingBuffer,
};
use crate::{ConfigOption, QueueConfig};

/// Bounded FIFO queue for tokio tasks.<br/>
/// tokio タスク向けの容量制限付き FIFO キュー。
///
/// `put` waits while the queue is full and `take` waits while it is empty. Every operation wakes all
/// waiters on the opposite condition, because a waiter whose future is dropped cannot pass a
/// wakeup on. The wake policy of the [`QueueConfig`] is therefore not used here.
///
/// Dropping a pending `put`/`take` future leaves the queue untouched. [`interrupt`](BlockingQueueWriter::interrupt)
/// makes every current and future wait fail with `QueueError::CancelledError`; operations that do not
/// need to wait keep working.
pub struct AsyncBoundedQueue<E> {
  inner: Arc<Inner<E>>,
}

impl<E> Clone for AsyncBoundedQueue<E> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

struct Inner<E> {
  buffer: Mutex<RingBuffer<E>>,
  not_full: Condvar,
  not_empty: Condvar,
  interrupted: AtomicBool,
  name: String,
}

impl<E> Debug for AsyncBoundedQueue<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut debug = f.debug_struct("AsyncBoundedQueue");
    debug.field("name", &self.inner.name);
    if let Ok(buffer) = self.inner.buffer.try_lock() {
      debug
        .field("capacity", &buffer.fixed_capacity())
        .field("size", &buffer.count());
    }
    debug
      .field("interrupted", &self.inner.interrupted.load(Ordering::Relaxed))
      .finish()
  }
}

impl<E: Element> AsyncBoundedQueue<E> {
  pub fn new(capacity: usize) -> Result<Self, QueueError<E>> {
    Self::from_config(QueueConfig::from([ConfigOption::with_capacity(capacity)]))
  }

  pub fn from_config(config: QueueConfig) -> Result<Self, QueueError<E>> {
    let buffer = RingBuffer::new(config.capacity)?;
    tracing::debug!(
      "AsyncBoundedQueue::from_config: name = {}, capacity = {}",
      config.name,
      config.capacity
    );
    Ok(Self {
      inner: Arc::new(Inner {
        buffer: Mutex::new(buffer),
        not_full: Condvar::new(),
        not_empty: Condvar::new(),
        interrupted: AtomicBool::new(false),
        name: config.name,
      }),
    })
  }

  pub fn name(&self) -> &str {
    &self.inner.name
  }

  /// Inserts `element`, waiting at most `timeout` for a free slot.
  ///
  /// # Errors
  /// - `QueueError::TimeoutError(Some(element))` when the timeout expires.
  /// - `QueueError::CancelledError(Some(element))` when the queue is interrupted.
  pub async fn put_timeout(&self, element: E, timeout: Duration) -> Result<(), QueueError<E>> {
    let mut pending = Some(element);
    let result = tokio::time::timeout(timeout, self.put_pending(&mut pending)).await;
    match result {
      Ok(result) => result,
      Err(_) => {
        tracing::debug!("AsyncBoundedQueue::put: timed out, name = {}", self.inner.name);
        Err(QueueError::TimeoutError(pending))
      }
    }
  }

  /// Removes the oldest element, waiting at most `timeout` for one to arrive.
  ///
  /// # Errors
  /// - `QueueError::TimeoutError(None)` when the timeout expires.
  /// - `QueueError::CancelledError(None)` when the queue is interrupted.
  pub async fn take_timeout(&self, timeout: Duration) -> Result<Option<E>, QueueError<E>> {
    let result = tokio::time::timeout(timeout, self.take_next()).await;
    match result {
      Ok(result) => result,
      Err(_) => {
        tracing::debug!("AsyncBoundedQueue::take: timed out, name = {}", self.inner.name);
        Err(QueueError::TimeoutError(None))
      }
    }
  }

  fn interrupted(&self) -> bool {
    self.inner.interrupted.load(Ordering::Acquire)
  }

  // The element stays in `pending` until it is written, so a dropped future hands nothing to the queue.
  async fn put_pending(&self, pending: &mut Option<E>) -> Result<(), QueueError<E>> {
    let mut buffer = self.inner.buffer.lock().await;
    while !buffer.has_room() {
      if self.interrupted() {
        tracing::debug!("AsyncBoundedQueue::put: interrupted, name = {}", self.inner.name);
        return Err(QueueError::CancelledError(pending.take()));
      }
      buffer = self.inner.not_full.wait(buffer).await;
    }
    if let Some(element) = pending.take() {
      buffer.push(element).map_err(QueueError::OfferError)?;
      self.inner.not_empty.notify_all();
    }
    Ok(())
  }

  async fn take_next(&self) -> Result<Option<E>, QueueError<E>> {
    let mut buffer = self.inner.buffer.lock().await;
    while !buffer.has_items() {
      if self.interrupted() {
        tracing::debug!("AsyncBoundedQueue::take: interrupted, name = {}", self.inner.name);
        return Err(QueueError::CancelledError(None));
      }
      buffer = self.inner.not_empty.wait(buffer).await;
    }
    let element = buffer.pop();
    self.inner.not_full.notify_all();
    Ok(element)
  }
}

#[async_trait]
impl<E: Element> QueueBase<E> for AsyncBoundedQueue<E> {
  async fn len(&self) -> usize {
    self.inner.buffer.lock().await.count()
  }

  async fn capacity(&self) -> usize {
    self.inner.buffer.lock().await.fixed_capacity()
  }
}

#[async_trait]
impl<E: Element> QueueWriter<E> for AsyncBoundedQueue<E> {
  async fn offer(&mut self, element: E) -> Result<(), QueueError<E>> {
    let mut buffer = self.inner.buffer.lock().await;
    buffer.push(element).map_err(QueueError::OfferError)?;
    self.inner.not_empty.notify_all();
    Ok(())
  }
}

#[async_trait]
impl<E: Element> QueueReader<E> for AsyncBoundedQueue<E> {
  async fn poll(&mut self) -> Result<Option<E>, QueueError<E>> {
    let mut buffer = self.inner.buffer.lock().await;
    let element = buffer.pop();
    if element.is_some() {
      self.inner.not_full.notify_all();
    }
    Ok(element)
  }

  async fn clean_up(&mut self) {
    let mut buffer = self.inner.buffer.lock().await;
    while buffer.pop().is_some() {}
    self.inner.not_full.notify_all();
  }
}

#[async_trait]
impl<E: Element> BlockingQueueBase<E> for AsyncBoundedQueue<E> {
  async fn remaining_capacity(&self) -> usize {
    self.inner.buffer.lock().await.remaining()
  }

  async fn is_interrupted(&self) -> bool {
    self.interrupted()
  }
}

#[async_trait]
impl<E: Element> BlockingQueueWriter<E> for AsyncBoundedQueue<E> {
  async fn put(&mut self, element: E) -> Result<(), QueueError<E>> {
    let mut pending = Some(element);
    self.put_pending(&mut pending).await
  }

  async fn interrupt(&mut self) {
    self.inner.interrupted.store(true, Ordering::Release);
    // Waiters check the flag under the lock, so notifying under it cannot slip between check and wait.
    let _buffer = self.inner.buffer.lock().await;
    tracing::debug!("AsyncBoundedQueue::interrupt: name = {}", self.inner.name);
    self.inner.not_full.notify_all();
    self.inner.not_empty.notify_all();
  }
}

#[async_trait]
impl<E: Element> BlockingQueueReader<E> for AsyncBoundedQueue<E> {
  async fn take(&mut self) -> Result<Option<E>, QueueError<E>> {
    self.take_next().await
  }
}
