use crate::RetryPolicy;

use std::time::Duration;

use carti_config::Config;

/// Runtime knobs of the [`crate::SessionSynchronizer`].
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Cache key of the profile snapshot
    pub profile_key: String,
    /// Bound for each profile read attempt
    pub fetch_timeout: Duration,
    pub retry: RetryPolicy,
}

impl SyncSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            profile_key: config.cache.profile_key.clone(),
            fetch_timeout: config.sync.fetch_timeout(),
            retry: RetryPolicy::from(&config.retry),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
