use crate::http::{read_json, transport_error};
use crate::{FirebaseSettings, StoredSession};

use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use async_trait::async_trait;
use carti_core::{BackendError, BackendResult, Identity, IdentityProvider, KeyValueCache, SessionEvents};
use chrono::{Duration, Utc};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

/// Refresh the id token when it expires within this many seconds.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    user_id: String,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

/// [`IdentityProvider`] over the Identity Toolkit REST API.
///
/// The session is persisted in the [`KeyValueCache`] so it survives
/// restarts, and id tokens are refreshed shortly before they expire.
pub struct FirebaseAuth {
    http: Client,
    settings: FirebaseSettings,
    cache: Arc<dyn KeyValueCache>,
    session_key: String,
    session: StdMutex<Option<StoredSession>>,
    listeners: StdMutex<Vec<UnboundedSender<Option<Identity>>>>,
    /// Serializes sign-in, sign-out and token refresh
    transition: Mutex<()>,
}

impl FirebaseAuth {
    /// Create the provider and restore any persisted session.
    pub async fn open(
        http: Client,
        settings: FirebaseSettings,
        cache: Arc<dyn KeyValueCache>,
        session_key: impl Into<String>,
    ) -> Self {
        let auth = Self {
            http,
            settings,
            cache,
            session_key: session_key.into(),
            session: StdMutex::new(None),
            listeners: StdMutex::new(Vec::new()),
            transition: Mutex::new(()),
        };
        auth.restore().await;
        auth
    }

    async fn restore(&self) {
        let raw = match self.cache.get(&self.session_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted session");
                return;
            }
            Err(e) => {
                warn!("Failed to read persisted session: {e}");
                return;
            }
        };

        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(session) => {
                info!("Restored session for {}", session.uid);
                self.set_session(Some(session));
            }
            Err(e) => {
                warn!("Persisted session is corrupted, discarding it: {e}");
                if let Err(e) = self.cache.delete(&self.session_key).await {
                    warn!("Failed to discard persisted session: {e}");
                }
            }
        }
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.current().map(|session| session.identity())
    }

    fn current(&self) -> Option<StoredSession> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_session(&self, session: Option<StoredSession>) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn notify(&self, identity: Option<Identity>) {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|listener| listener.send(identity.clone()).is_ok());
    }

    fn accounts_url(&self, action: &str) -> String {
        format!(
            "{}/accounts:{action}?key={}",
            self.settings.auth_url,
            urlencoding::encode(&self.settings.api_key)
        )
    }

    fn token_url(&self) -> String {
        format!(
            "{}/token?key={}",
            self.settings.token_url,
            urlencoding::encode(&self.settings.api_key)
        )
    }

    async fn post<T: DeserializeOwned>(&self, url: &str, body: &Value) -> BackendResult<T> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }

    async fn persist(&self, session: &StoredSession) {
        let raw = match serde_json::to_string(session) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize session for {}: {e}", session.uid);
                return;
            }
        };
        if let Err(e) = self.cache.set(&self.session_key, &raw).await {
            warn!("Session for {} not persisted: {e}", session.uid);
        }
    }

    async fn start_session(&self, account: AccountResponse) -> BackendResult<Identity> {
        let session = StoredSession {
            uid: account.local_id,
            email: account.email,
            id_token: account.id_token,
            refresh_token: account.refresh_token,
            expires_at: Utc::now() + parse_expires_in(&account.expires_in)?,
        };

        self.persist(&session).await;
        let identity = session.identity();
        self.set_session(Some(session));
        self.notify(Some(identity.clone()));
        Ok(identity)
    }

    /// Forget a session the backend no longer honours.
    async fn drop_session(&self) {
        if let Err(e) = self.cache.delete(&self.session_key).await {
            warn!("Failed to delete persisted session: {e}");
        }
        self.set_session(None);
        self.notify(None);
    }

    /// Id token for the current session, refreshed when close to expiry.
    /// `None` when signed out.
    ///
    /// A refresh the backend rejects ends the session.
    pub async fn id_token(&self) -> BackendResult<Option<String>> {
        let _guard = self.transition.lock().await;

        let Some(session) = self.current() else {
            return Ok(None);
        };
        if !session.expires_within(Duration::seconds(REFRESH_MARGIN_SECS), Utc::now()) {
            return Ok(Some(session.id_token));
        }

        debug!("Refreshing id token for {}", session.uid);
        match self.refresh(&session).await {
            Ok(refreshed) => Ok(Some(refreshed.id_token)),
            Err(e) if !e.is_transient() => {
                warn!("Session of {} was revoked: {e}", session.uid);
                self.drop_session().await;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    async fn refresh(&self, session: &StoredSession) -> BackendResult<StoredSession> {
        let body = json!({
            "grant_type": "refresh_token",
            "refresh_token": session.refresh_token,
        });
        let response: TokenResponse = self.post(&self.token_url(), &body).await?;

        let refreshed = StoredSession {
            uid: response.user_id,
            email: session.email.clone(),
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_at: Utc::now() + parse_expires_in(&response.expires_in)?,
        };
        self.persist(&refreshed).await;
        self.set_session(Some(refreshed.clone()));
        Ok(refreshed)
    }
}

fn parse_expires_in(expires_in: &str) -> BackendResult<Duration> {
    expires_in
        .parse::<i64>()
        .map(Duration::seconds)
        .map_err(|e| BackendError::decode(format!("expiresIn '{expires_in}': {e}")))
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    fn subscribe(&self) -> SessionEvents {
        let (sender, receiver) = unbounded_channel();
        // New listeners learn the current session first
        let _ = sender.send(self.current_identity());
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        receiver
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let _guard = self.transition.lock().await;

        let Some(session) = self.current() else {
            return Ok(());
        };

        self.cache.delete(&self.session_key).await?;
        self.set_session(None);
        self.notify(None);
        info!("Signed out {}", session.uid);
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Identity> {
        let _guard = self.transition.lock().await;

        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let account: AccountResponse = self
            .post(&self.accounts_url("signInWithPassword"), &body)
            .await?;

        let identity = self.start_session(account).await?;
        info!("Signed in {}", identity.uid);
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> BackendResult<Identity> {
        let _guard = self.transition.lock().await;

        let body = json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let account: AccountResponse = self.post(&self.accounts_url("signUp"), &body).await?;

        let identity = self.start_session(account).await?;
        info!("Created account {}", identity.uid);
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> BackendResult<()> {
        let body = json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });
        let _: Value = self.post(&self.accounts_url("sendOobCode"), &body).await?;
        Ok(())
    }
}
