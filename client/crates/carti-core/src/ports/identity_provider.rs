use crate::{BackendResult, Identity};

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

/// Stream of session changes: `Some` on sign-in, `None` on sign-out,
/// expiry or revocation. Dropping the receiver unsubscribes.
pub type SessionEvents = UnboundedReceiver<Option<Identity>>;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a session listener.
    ///
    /// Providers that already know the session deliver it as the first
    /// event; notifications arrive in the order they happened.
    fn subscribe(&self) -> SessionEvents;

    /// Terminate the current session.
    async fn sign_out(&self) -> BackendResult<()>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Identity>;

    /// Create an account and sign it in.
    async fn sign_up(&self, email: &str, password: &str) -> BackendResult<Identity>;

    /// Ask the provider to email a password reset link.
    async fn send_password_reset(&self, email: &str) -> BackendResult<()>;
}
