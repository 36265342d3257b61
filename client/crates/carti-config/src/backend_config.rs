use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_AUTH_URL, DEFAULT_FIRESTORE_URL, DEFAULT_PROJECT_ID,
    DEFAULT_TOKEN_URL,
};

use serde::Deserialize;

/// Remote identity provider and document store endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Web API key; sent as the `key` query parameter. Never logged.
    pub api_key: Option<String>,
    pub project_id: String,
    pub auth_url: String,
    pub token_url: String,
    pub firestore_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: String::from(DEFAULT_PROJECT_ID),
            auth_url: String::from(DEFAULT_AUTH_URL),
            token_url: String::from(DEFAULT_TOKEN_URL),
            firestore_url: String::from(DEFAULT_FIRESTORE_URL),
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(ref key) = self.api_key
            && key.trim().is_empty()
        {
            return Err(ConfigError::backend("backend.api_key cannot be empty"));
        }

        if self.project_id.is_empty()
            || !self
                .project_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::backend(format!(
                "backend.project_id must be non-empty [a-z0-9-], got '{}'",
                self.project_id
            )));
        }

        for (name, url) in [
            ("auth_url", &self.auth_url),
            ("token_url", &self.token_url),
            ("firestore_url", &self.firestore_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::backend(format!(
                    "backend.{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}
