use crate::registration::validate_email;
use crate::{Credentials, Registration, Result, SessionError};

use std::sync::Arc;

use carti_core::{DocumentStore, Identity, IdentityProvider, Profile, USERS_COLLECTION};
use chrono::Utc;
use log::{info, warn};

/// Calls that start a session or recover access to one.
///
/// The resulting session change reaches the [`crate::SessionSynchronizer`]
/// through the identity provider's notifications, not through this type.
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
    store: Arc<dyn DocumentStore>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>, store: Arc<dyn DocumentStore>) -> Self {
        Self { provider, store }
    }

    /// Create the account, then its profile document.
    ///
    /// The provider signs the new account in before the profile is written,
    /// so a synchronizer may see "no document yet" first and should be
    /// refreshed once this returns.
    pub async fn register(&self, registration: &Registration) -> Result<Profile> {
        registration.validate()?;

        let identity = self
            .provider
            .sign_up(registration.email.trim(), &registration.password)
            .await
            .map_err(SessionError::auth)?;

        let profile = registration.to_profile(&identity.uid, Utc::now());
        let fields = profile.to_fields().map_err(SessionError::profile_write)?;

        if let Err(e) = self
            .store
            .set_document(USERS_COLLECTION, &identity.uid, &fields)
            .await
        {
            warn!(
                "Account {} created but its profile was not stored: {e}",
                identity.uid
            );
            return Err(SessionError::profile_write(e));
        }

        info!("Registered {}", identity.uid);
        Ok(profile)
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Identity> {
        credentials.validate()?;

        let identity = self
            .provider
            .sign_in(credentials.email.trim(), &credentials.password)
            .await
            .map_err(SessionError::auth)?;

        info!("Signed in {}", identity.uid);
        Ok(identity)
    }

    pub async fn send_password_reset(&self, email: &str) -> Result<()> {
        validate_email(email)?;

        self.provider
            .send_password_reset(email.trim())
            .await
            .map_err(SessionError::auth)?;

        info!("Password reset requested");
        Ok(())
    }
}
