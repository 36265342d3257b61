//! Client-side session and profile state.
//!
//! [`SessionSynchronizer`] follows the identity provider's session changes
//! and keeps the signed-in user's profile consistent between the remote
//! document store and the on-device cache. [`AuthService`] covers the
//! sign-in, registration and password-reset calls that start a session.

pub mod auth_service;
pub mod error;
pub mod file_cache;
pub mod registration;
pub mod retry;
pub mod session_state;
pub mod sync_settings;
pub mod synchronizer;

pub use auth_service::AuthService;
pub use error::{Result, SessionError};
pub use file_cache::FileCache;
pub use registration::{Credentials, Registration};
pub use retry::{IsRetryable, RetryPolicy, with_retry};
pub use session_state::SessionState;
pub use sync_settings::SyncSettings;
pub use synchronizer::SessionSynchronizer;

#[cfg(test)]
mod tests;
