#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  use crate::concurrent::CancellationToken;

  #[test]
  fn test_clones_share_cancellation() {
    let token = CancellationToken::new();
    let cloned = token.clone();
    assert!(!cloned.is_cancelled());
    token.cancel();
    assert!(cloned.is_cancelled());
    assert_eq!(token, cloned);
    assert_ne!(token, CancellationToken::new());
  }

  #[test]
  fn test_cancel_wakes_registered_wakers_once() {
    let token = CancellationToken::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let waker_calls = Arc::clone(&calls);
    let registration = token.register(Arc::new(move || {
      waker_calls.fetch_add(1, Ordering::SeqCst);
    }));
    assert!(registration.is_some());

    token.cancel();
    token.cancel();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    drop(registration);
  }

  #[test]
  fn test_dropped_registration_is_not_woken() {
    let token = CancellationToken::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let waker_calls = Arc::clone(&calls);
    let registration = token.register(Arc::new(move || {
      waker_calls.fetch_add(1, Ordering::SeqCst);
    }));
    drop(registration);

    token.cancel();
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn test_register_after_cancel_is_refused() {
    let token = CancellationToken::new();
    token.cancel();
    assert!(token.register(Arc::new(|| {})).is_none());
  }
}
