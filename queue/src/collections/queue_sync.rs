use std::fmt::Debug;

use crate::collections::QueueError;

/// Synchronous counterpart of [`QueueBase`](crate::collections::QueueBase) for queues used from plain threads.<br/>
/// スレッドから利用するキューのための同期版 `QueueBase`。
pub trait SyncQueueBase<E>: Debug {
  fn len(&self) -> usize;
  fn capacity(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn is_full(&self) -> bool {
    self.capacity() == self.len()
  }

  fn non_empty(&self) -> bool {
    !self.is_empty()
  }

  fn non_full(&self) -> bool {
    !self.is_full()
  }
}

pub trait SyncQueueWriter<E>: SyncQueueBase<E> {
  fn offer(&mut self, element: E) -> Result<(), QueueError<E>>;

  fn offer_all<I>(&mut self, elements: I) -> Result<(), QueueError<E>>
  where
    I: IntoIterator<Item = E>, {
    for element in elements {
      self.offer(element)?;
    }
    Ok(())
  }
}

pub trait SyncQueueReader<E>: SyncQueueBase<E> {
  fn poll(&mut self) -> Result<Option<E>, QueueError<E>>;
  fn clean_up(&mut self);
}
