use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CACHE_DIR, DEFAULT_PROFILE_KEY, DEFAULT_SESSION_KEY,
};

use std::path::Path;

use serde::Deserialize;

/// On-device key-value cache location and the keys the client owns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Relative to the config directory
    pub dir: String,
    /// Key of the cached profile snapshot
    pub profile_key: String,
    /// Key of the persisted sign-in session
    pub session_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: String::from(DEFAULT_CACHE_DIR),
            profile_key: String::from(DEFAULT_PROFILE_KEY),
            session_key: String::from(DEFAULT_SESSION_KEY),
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.dir.is_empty() || Path::new(&self.dir).is_absolute() || self.dir.contains("..") {
            return Err(ConfigError::cache(
                "cache.dir must be relative and cannot contain '..'",
            ));
        }

        if self.profile_key.trim().is_empty() || self.session_key.trim().is_empty() {
            return Err(ConfigError::cache("cache keys cannot be empty"));
        }

        if self.profile_key == self.session_key {
            return Err(ConfigError::cache(format!(
                "cache.profile_key and cache.session_key must differ, both are '{}'",
                self.profile_key
            )));
        }

        Ok(())
    }
}
