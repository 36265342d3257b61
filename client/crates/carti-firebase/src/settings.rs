use carti_config::BackendConfig;
use carti_core::{BackendError, BackendResult};

/// Endpoints and credentials for one Firebase project.
#[derive(Clone)]
pub struct FirebaseSettings {
    pub api_key: String,
    pub project_id: String,
    pub auth_url: String,
    pub token_url: String,
    pub firestore_url: String,
}

impl FirebaseSettings {
    pub fn from_config(config: &BackendConfig) -> BackendResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            BackendError::rejected(
                "MISSING_API_KEY",
                "backend.api_key is not set (CARTI_API_KEY)",
            )
        })?;

        Ok(Self {
            api_key,
            project_id: config.project_id.clone(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.trim_end_matches('/').to_string(),
            firestore_url: config.firestore_url.trim_end_matches('/').to_string(),
        })
    }

    /// Same project with every endpoint rooted at `base_url`.
    pub fn local(api_key: &str, project_id: &str, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Self {
            api_key: api_key.to_string(),
            project_id: project_id.to_string(),
            auth_url: base_url.to_string(),
            token_url: base_url.to_string(),
            firestore_url: base_url.to_string(),
        }
    }

    /// Root of the default database's documents.
    pub fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            self.firestore_url, self.project_id
        )
    }
}

impl std::fmt::Debug for FirebaseSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseSettings")
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("firestore_url", &self.firestore_url)
            .finish()
    }
}
