use crate::config::{QueueConfig, WakePolicy};

#[derive(Debug, Clone)]
pub enum ConfigOption {
  SetCapacity(usize),
  SetWakePolicy(WakePolicy),
  SetName(String),
}

impl ConfigOption {
  pub fn apply(&self, config: &mut QueueConfig) {
    match self {
      ConfigOption::SetCapacity(capacity) => {
        config.capacity = *capacity;
      }
      ConfigOption::SetWakePolicy(wake_policy) => {
        config.wake_policy = *wake_policy;
      }
      ConfigOption::SetName(name) => {
        config.name = name.clone();
      }
    }
  }

  pub fn with_capacity(capacity: usize) -> ConfigOption {
    ConfigOption::SetCapacity(capacity)
  }

  pub fn with_wake_policy(wake_policy: WakePolicy) -> ConfigOption {
    ConfigOption::SetWakePolicy(wake_policy)
  }

  pub fn with_name(name: String) -> ConfigOption {
    ConfigOption::SetName(name)
  }
}
