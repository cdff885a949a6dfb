/*!
Configuration for edgedock.

All values have sensible defaults. Create a custom config to override:

```ignore
use edgedock::{Config, Shell};

let config = Config {
    running_as_shell: true,
    ..Default::default()
};

let shell = Shell::builder().config(config).registry(registry).build()?;
```

Configs can also be loaded from JSON; missing fields keep their defaults.
*/

use serde::Deserialize;

use crate::types::{AppBarError, AppBarResult};

/// edgedock configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
  /// Capacity of the event broadcast channel.
  /// Default: 1000 events.
  pub event_channel_capacity: usize,

  /// Full-screen poll interval in milliseconds.
  /// Default: 100ms.
  pub poll_interval_ms: u64,

  /// Delay before re-asserting a registry-assigned position, and before the
  /// deferred `set_position` used when running as shell.
  /// Default: 100ms.
  pub reassert_delay_ms: u64,

  /// True when this process replaces the desktop shell. Shell-mode bars
  /// position themselves and own the work area instead of deferring to the
  /// registry. Default: false.
  pub running_as_shell: bool,

  /// Window classes of the desktop background, never treated as full-screen.
  /// Default: `Progman`, `WorkerW`.
  pub desktop_window_classes: Vec<String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      event_channel_capacity: 1000,
      poll_interval_ms: 100,
      reassert_delay_ms: 100,
      running_as_shell: false,
      desktop_window_classes: vec!["Progman".to_string(), "WorkerW".to_string()],
    }
  }
}

impl Config {
  /// Create a new config with default values.
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse a config from JSON. Missing fields keep their defaults.
  pub fn from_json(json: &str) -> AppBarResult<Self> {
    let config: Self =
      serde_json::from_str(json).map_err(|e| AppBarError::InvalidConfig(e.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub(crate) fn validate(&self) -> AppBarResult<()> {
    if self.event_channel_capacity == 0 {
      return Err(AppBarError::InvalidConfig(
        "eventChannelCapacity must be at least 1".to_string(),
      ));
    }
    if self.poll_interval_ms == 0 {
      return Err(AppBarError::InvalidConfig(
        "pollIntervalMs must be at least 1".to_string(),
      ));
    }
    Ok(())
  }

  /// Check if a window class belongs to the desktop background.
  pub(crate) fn is_desktop_class(&self, class_name: &str) -> bool {
    self
      .desktop_window_classes
      .iter()
      .any(|c| c.as_str() == class_name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_config_values() {
    let config = Config::default();
    assert_eq!(config.event_channel_capacity, 1000);
    assert_eq!(config.poll_interval_ms, 100);
    assert_eq!(config.reassert_delay_ms, 100);
    assert!(!config.running_as_shell);
    assert!(config.is_desktop_class("Progman"));
    assert!(config.is_desktop_class("WorkerW"));
    assert!(!config.is_desktop_class("Notepad"));
  }

  #[test]
  fn partial_json_keeps_defaults() {
    let config = Config::from_json(r#"{ "runningAsShell": true, "pollIntervalMs": 250 }"#).unwrap();
    assert!(config.running_as_shell);
    assert_eq!(config.poll_interval_ms, 250);
    assert_eq!(config.reassert_delay_ms, 100);
  }

  #[test]
  fn malformed_json_is_invalid_config() {
    let err = Config::from_json("{ not json").unwrap_err();
    assert!(matches!(err, AppBarError::InvalidConfig(_)));
  }

  #[test]
  fn zero_interval_is_rejected() {
    let err = Config::from_json(r#"{ "pollIntervalMs": 0 }"#).unwrap_err();
    assert!(matches!(err, AppBarError::InvalidConfig(_)));
  }
}
