use crate::ConfigOption;

/// How many waiters an operation wakes on the opposite condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WakePolicy {
  /// Wake a single waiter per `put`/`get`. A woken waiter retries its operation before it checks for
  /// cancellation or timeout, so a wakeup is never dropped by a waiter on its way out.
  #[default]
  Signal,
  /// Wake every waiter per `put`/`get`; each re-checks the condition and all but the winners go back to sleep.
  Broadcast,
}

#[derive(Debug, Clone)]
pub struct QueueConfig {
  pub capacity: usize,
  pub wake_policy: WakePolicy,
  pub name: String,
}

impl Default for QueueConfig {
  fn default() -> Self {
    QueueConfig {
      capacity: 16,
      wake_policy: WakePolicy::Signal,
      name: "bounded-queue".to_string(),
    }
  }
}

impl QueueConfig {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> QueueConfig {
    let mut config = QueueConfig::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }
}
