use std::fmt::Debug;

use async_trait::async_trait;

use thiserror::Error;

mod async_bounded_queue;
mod bounded_queue;
mod ring_buffer;

pub use self::{async_bounded_queue::*, bounded_queue::*, ring_buffer::*};

use crate::collections::element::Element;

/// An error that occurs when a queue operation fails.<br/>
/// キューの操作に失敗した場合に発生するエラー。
#[derive(Error, Debug, PartialEq)]
pub enum QueueError<E> {
  /// The queue could not be constructed with the given argument.<br/>
  /// 引数が不正なためキューを生成できない。
  #[error("Invalid argument: {0}")]
  InvalidArgument(String),
  /// The queue is full and the element was handed back.<br/>
  /// キューが満杯のため要素を返却する。
  #[error("Failed to offer an element: {0:?}")]
  OfferError(E),
  /// A blocked operation was cancelled. A rejected `put` hands its element back.<br/>
  /// 待機中の操作がキャンセルされた。
  #[error("Cancelled while waiting")]
  CancelledError(Option<E>),
  /// A bounded wait expired. A rejected `put` hands its element back.<br/>
  /// 待機がタイムアウトした。
  #[error("Timed out while waiting")]
  TimeoutError(Option<E>),
}

impl<E> QueueError<E> {
  /// Returns the element carried by this error, if any.<br/>
  /// このエラーが保持している要素を返します。
  pub fn into_element(self) -> Option<E> {
    match self {
      QueueError::OfferError(element) => Some(element),
      QueueError::CancelledError(element) | QueueError::TimeoutError(element) => element,
      QueueError::InvalidArgument(_) => None,
    }
  }

  pub fn is_cancelled(&self) -> bool {
    matches!(self, QueueError::CancelledError(_))
  }

  pub fn is_timeout(&self) -> bool {
    matches!(self, QueueError::TimeoutError(_))
  }

  pub(crate) fn invalid_capacity(capacity: usize) -> Self {
    QueueError::InvalidArgument(format!("capacity must be greater than zero: {}", capacity))
  }
}

/// A trait that defines the behavior of a queue.<br/>
/// キューの振る舞いを定義するトレイト。
#[async_trait]
pub trait QueueBase<E: Element>: Debug + Send + Sync {
  /// Returns whether this queue is empty.<br/>
  /// このキューが空かどうかを返します。
  async fn is_empty(&self) -> bool {
    self.len().await == 0
  }

  /// Returns whether this queue is non-empty.<br/>
  /// このキューが空でないかどうかを返します。
  async fn non_empty(&self) -> bool {
    !self.is_empty().await
  }

  /// Returns whether the queue size has reached its capacity.<br/>
  /// このキューのサイズが容量まで到達したかどうかを返します。
  async fn is_full(&self) -> bool {
    self.capacity().await == self.len().await
  }

  /// Returns whether the queue size has not reached its capacity.<br/>
  /// このキューのサイズが容量まで到達してないかどうかを返します。
  async fn non_full(&self) -> bool {
    !self.is_full().await
  }

  /// Returns the length of this queue.<br/>
  /// このキューの長さを返します。
  async fn len(&self) -> usize;

  /// Returns the capacity of this queue.<br/>
  /// このキューの最大容量を返します。
  async fn capacity(&self) -> usize;
}

#[async_trait]
pub trait QueueWriter<E: Element>: QueueBase<E> {
  /// The specified element will be inserted into this queue,
  /// if the queue can be executed immediately without violating the capacity limit.<br/>
  /// 容量制限に違反せずにすぐ実行できる場合は、指定された要素をこのキューに挿入します。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(())` - If the element is inserted successfully. / 要素が正常に挿入された場合。
  /// - `Err(QueueError::OfferError(element))` - If the element cannot be inserted. / 要素を挿入できなかった場合。
  async fn offer(&mut self, element: E) -> Result<(), QueueError<E>>;

  /// The specified elements will be inserted into this queue,
  /// if the queue can be executed immediately without violating the capacity limit.<br/>
  /// 容量制限に違反せずにすぐ実行できる場合は、指定された複数の要素をこのキューに挿入します。
  async fn offer_all(&mut self, elements: Vec<E>) -> Result<(), QueueError<E>> {
    for e in elements {
      self.offer(e).await?;
    }
    Ok(())
  }
}

#[async_trait]
pub trait QueueReader<E: Element>: QueueBase<E> {
  /// Retrieves and deletes the head of the queue. Returns None if the queue is empty.<br/>
  /// キューの先頭を取得および削除します。キューが空の場合は None を返します。
  async fn poll(&mut self) -> Result<Option<E>, QueueError<E>>;

  /// Drops every buffered element.<br/>
  /// バッファされている要素をすべて破棄します。
  async fn clean_up(&mut self);
}

/// A trait that defines the behavior of a blocking queue.<br/>
/// ブロッキングキューの振る舞いを定義するトレイト。
#[async_trait]
pub trait BlockingQueueBase<E: Element>: QueueBase<E> + Send {
  /// Returns the number of elements that can be inserted into this queue without blocking.<br/>
  /// ブロックせずにこのキューに挿入できる要素数を返します。
  async fn remaining_capacity(&self) -> usize;

  /// Returns whether the operation of this queue has been interrupted.<br/>
  /// このキューの操作が中断されたかどうかを返します。
  async fn is_interrupted(&self) -> bool;
}

#[async_trait]
pub trait BlockingQueueWriter<E: Element>: BlockingQueueBase<E> + QueueWriter<E> {
  /// Inserts the specified element into this queue. If necessary, waits until space is available.<br/>
  /// 指定された要素をこのキューに挿入します。必要に応じて、空きが生じるまで待機します。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(())` - If the element is inserted successfully. / 要素が正常に挿入された場合。
  /// - `Err(QueueError::CancelledError(Some(element)))` - If the wait is interrupted. / 待機が中断された場合。
  async fn put(&mut self, element: E) -> Result<(), QueueError<E>>;

  /// Interrupts the operation of this queue.<br/>
  /// このキューの操作を中断します。
  async fn interrupt(&mut self);
}

#[async_trait]
pub trait BlockingQueueReader<E: Element>: BlockingQueueBase<E> {
  /// Retrieve the head of this queue and delete it. If necessary, wait until an element becomes available.<br/>
  /// このキューの先頭を取得して削除します。必要に応じて、要素が利用可能になるまで待機します。
  ///
  /// # Return Value / 戻り値
  /// - `Ok(Some(element))` - If the element is retrieved successfully. / 要素が正常に取得された場合。
  /// - `Err(QueueError::CancelledError(None))` - If the wait is interrupted. / 待機が中断された場合。
  async fn take(&mut self) -> Result<Option<E>, QueueError<E>>;
}
