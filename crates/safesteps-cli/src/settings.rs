//! Shell configuration, read from `safesteps.toml` and `SAFESTEPS_*`
//! environment variables.

use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
  /// SQLite file holding every persisted key. `:memory:` keeps nothing.
  pub storage_path:           PathBuf,
  pub locale:                 String,

  // Simulated device.
  pub origin_latitude:        f64,
  pub origin_longitude:       f64,
  pub origin_accuracy:        f64,
  pub deny_location:          bool,
  pub location_latency_ms:    u64,
  pub watch_interval_ms:      u64,

  // Simulated backend.
  pub auth_latency_ms:        u64,
  pub biometric_latency_ms:   u64,
  pub recognition_latency_ms: u64,
}

impl Default for ShellConfig {
  fn default() -> Self {
    Self {
      storage_path:           PathBuf::from("safesteps.db"),
      locale:                 safesteps_core::speech::DEFAULT_LOCALE.to_string(),
      origin_latitude:        -23.550520,
      origin_longitude:       -46.633308,
      origin_accuracy:        12.0,
      deny_location:          false,
      location_latency_ms:    300,
      watch_interval_ms:      3000,
      auth_latency_ms:        1000,
      biometric_latency_ms:   1500,
      recognition_latency_ms: 2000,
    }
  }
}

impl ShellConfig {
  pub fn location_latency(&self) -> Duration { Duration::from_millis(self.location_latency_ms) }

  pub fn watch_interval(&self) -> Duration { Duration::from_millis(self.watch_interval_ms) }

  pub fn auth_latency(&self) -> Duration { Duration::from_millis(self.auth_latency_ms) }

  pub fn biometric_latency(&self) -> Duration { Duration::from_millis(self.biometric_latency_ms) }

  pub fn recognition_latency(&self) -> Duration {
    Duration::from_millis(self.recognition_latency_ms)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_sources_keep_defaults() {
    let settings = config::Config::builder()
      .set_override("deny_location", true)
      .unwrap()
      .set_override("watch_interval_ms", 500)
      .unwrap()
      .build()
      .unwrap();
    let cfg: ShellConfig = settings.try_deserialize().unwrap();
    assert!(cfg.deny_location);
    assert_eq!(cfg.watch_interval(), Duration::from_millis(500));
    assert_eq!(cfg.storage_path, PathBuf::from("safesteps.db"));
    assert_eq!(cfg.locale, "pt-BR");
  }
}
