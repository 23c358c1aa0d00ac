use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Cooperative cancellation source for blocking queue operations.<br/>
/// 待機中のキュー操作を協調的にキャンセルするためのトークン。
///
/// Clones share state: cancelling any clone cancels all of them. Cancellation is permanent.
/// Every wait registered with the token at the moment of [`cancel`](CancellationToken::cancel)
/// is woken and fails with [`QueueError::CancelledError`](crate::collections::QueueError::CancelledError).
#[derive(Clone, Default)]
pub struct CancellationToken {
  inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
  cancelled: AtomicBool,
  next_id: AtomicU64,
  wakers: Mutex<Vec<(u64, Waker)>>,
}

impl Debug for CancellationToken {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CancellationToken")
      .field("cancelled", &self.is_cancelled())
      .field("waiters", &self.inner.wakers.lock().len())
      .finish()
  }
}

impl PartialEq for CancellationToken {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl Eq for CancellationToken {}

impl CancellationToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_cancelled(&self) -> bool {
    self.inner.cancelled.load(Ordering::Acquire)
  }

  /// Cancels the token and wakes every registered wait.
  pub fn cancel(&self) {
    if self.inner.cancelled.swap(true, Ordering::AcqRel) {
      return;
    }
    // Wakers lock the queue they belong to, so they must run after the registry lock is released.
    let wakers = std::mem::take(&mut *self.inner.wakers.lock());
    tracing::debug!("CancellationToken::cancel: waking {} waiter(s)", wakers.len());
    for (_, waker) in wakers {
      waker();
    }
  }

  /// Registers `waker` to be called on cancellation.
  ///
  /// Returns `None` if the token is already cancelled; the caller must not wait in that case.
  /// The registration is removed when the returned guard is dropped.
  pub(crate) fn register(&self, waker: Waker) -> Option<Registration<'_>> {
    let mut wakers = self.inner.wakers.lock();
    if self.is_cancelled() {
      return None;
    }
    let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
    wakers.push((id, waker));
    Some(Registration { token: self, id })
  }
}

pub(crate) struct Registration<'a> {
  token: &'a CancellationToken,
  id: u64,
}

impl Drop for Registration<'_> {
  fn drop(&mut self) {
    self.token.inner.wakers.lock().retain(|(id, _)| *id != self.id);
  }
}
