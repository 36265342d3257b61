use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const MIN_FETCH_TIMEOUT_MS: u64 = 100;
pub const MAX_FETCH_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Session synchronization tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Upper bound for a single profile read attempt
    pub fetch_timeout_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_FETCH_TIMEOUT_MS..=MAX_FETCH_TIMEOUT_MS).contains(&self.fetch_timeout_ms) {
            return Err(ConfigError::sync(format!(
                "sync.fetch_timeout_ms must be {}-{}, got {}",
                MIN_FETCH_TIMEOUT_MS, MAX_FETCH_TIMEOUT_MS, self.fetch_timeout_ms
            )));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}
