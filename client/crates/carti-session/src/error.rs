use std::panic::Location;

use carti_core::BackendError;
use error_location::ErrorLocation;
use thiserror::Error;

/// Errors surfaced to callers of the session operations.
///
/// Read paths (the session-change fetch, `refresh_profile`) never return
/// these; they degrade to the last known state and log instead.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Sign-out failed: {source} {location}")]
    SignOut {
        #[source]
        source: BackendError,
        location: ErrorLocation,
    },

    #[error("Profile update rejected by the document store: {source} {location}")]
    ProfileWrite {
        #[source]
        source: BackendError,
        location: ErrorLocation,
    },

    #[error("Local cache error: {source} {location}")]
    Cache {
        #[source]
        source: BackendError,
        location: ErrorLocation,
    },

    #[error("Authentication failed: {source} {location}")]
    Auth {
        #[source]
        source: BackendError,
        location: ErrorLocation,
    },

    #[error("Invalid {field}: {message} {location}")]
    Validation {
        field: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to serialize profile: {source} {location}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl SessionError {
    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::SignOut { source, .. }
            | Self::ProfileWrite { source, .. }
            | Self::Cache { source, .. }
            | Self::Auth { source, .. } => source.is_transient(),
            Self::Validation { .. } | Self::Serialization { .. } => false,
        }
    }

    /// User-facing hint for the failure.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::SignOut { .. } => {
                "You are still signed in. \
                   Check your connection and try signing out again."
            }
            Self::ProfileWrite { source, .. } if source.is_transient() => {
                "Your changes were not saved. \
                   Check your connection and try again."
            }
            Self::ProfileWrite { .. } => {
                "Your changes were not accepted. \
                   Sign in again and retry."
            }
            Self::Cache { .. } => {
                "Unable to update on-device data. \
                   Check free disk space and file permissions."
            }
            Self::Auth { source, .. } if source.is_transient() => {
                "Unable to reach the sign-in service. \
                   Check your connection and try again."
            }
            Self::Auth { .. } => "Check your email and password and try again.",
            Self::Validation { .. } => "Correct the highlighted field and submit again.",
            Self::Serialization { .. } => {
                "Internal error preparing profile data. \
                   Please report this issue."
            }
        }
    }

    /// Field name for validation failures, for form highlighting.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    #[track_caller]
    pub fn sign_out(source: BackendError) -> Self {
        Self::SignOut {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn profile_write(source: BackendError) -> Self {
        Self::ProfileWrite {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn cache(source: BackendError) -> Self {
        Self::Cache {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn auth(source: BackendError) -> Self {
        Self::Auth {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for SessionError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
