use std::fmt::Debug;

use crate::collections::{QueueError, SyncQueueBase, SyncQueueReader, SyncQueueWriter};

/// Fixed-capacity slot storage shared by the blocking queues.<br/>
/// Elements are written at `write_index` and read from `read_index`, both advancing modulo the capacity.
/// A consumed slot is left empty so the queue never keeps a dequeued element alive.
#[derive(Debug)]
pub struct RingBuffer<E> {
  slots: Box<[Option<E>]>,
  write_index: usize,
  read_index: usize,
  count: usize,
}

impl<E> RingBuffer<E> {
  pub fn new(capacity: usize) -> Result<Self, QueueError<E>> {
    if capacity == 0 {
      return Err(QueueError::invalid_capacity(capacity));
    }
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    Ok(Self {
      slots: slots.into_boxed_slice(),
      write_index: 0,
      read_index: 0,
      count: 0,
    })
  }

  pub fn count(&self) -> usize {
    self.count
  }

  pub fn fixed_capacity(&self) -> usize {
    self.slots.len()
  }

  pub fn remaining(&self) -> usize {
    self.slots.len() - self.count
  }

  pub fn has_room(&self) -> bool {
    self.count < self.slots.len()
  }

  pub fn has_items(&self) -> bool {
    self.count > 0
  }

  #[cfg(test)]
  pub(crate) fn indices(&self) -> (usize, usize) {
    (self.write_index, self.read_index)
  }

  pub(crate) fn push(&mut self, element: E) -> Result<(), E> {
    if !self.has_room() {
      return Err(element);
    }
    self.slots[self.write_index] = Some(element);
    self.write_index = (self.write_index + 1) % self.slots.len();
    self.count += 1;
    Ok(())
  }

  pub(crate) fn pop(&mut self) -> Option<E> {
    if !self.has_items() {
      return None;
    }
    let element = self.slots[self.read_index].take();
    self.read_index = (self.read_index + 1) % self.slots.len();
    self.count -= 1;
    element
  }
}

impl<E: Debug> SyncQueueBase<E> for RingBuffer<E> {
  fn len(&self) -> usize {
    self.count
  }

  fn capacity(&self) -> usize {
    self.slots.len()
  }
}

impl<E: Debug> SyncQueueWriter<E> for RingBuffer<E> {
  fn offer(&mut self, element: E) -> Result<(), QueueError<E>> {
    self.push(element).map_err(QueueError::OfferError)
  }
}

impl<E: Debug> SyncQueueReader<E> for RingBuffer<E> {
  fn poll(&mut self) -> Result<Option<E>, QueueError<E>> {
    Ok(self.pop())
  }

  fn clean_up(&mut self) {
    while self.pop().is_some() {}
    self.write_index = 0;
    self.read_index = 0;
  }
}
