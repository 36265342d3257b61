use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

/// Failures reported by the remote and local collaborators
/// (identity provider, document store, key-value cache).
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend unavailable: {message} {location}")]
    Unavailable {
        message: String,
        location: ErrorLocation,
    },

    #[error("Backend call timed out after {after_ms}ms {location}")]
    Timeout { after_ms: u64, location: ErrorLocation },

    #[error("Backend rejected request ({code}): {message} {location}")]
    Rejected {
        code: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Failed to decode backend payload: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },

    #[error("Local storage error at {path}: {source} {location}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
        location: ErrorLocation,
    },
}

impl BackendError {
    /// Whether the failure is worth retrying or falling back on cached state.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::Timeout { .. } | Self::Io { .. }
        )
    }

    /// Stable machine-readable code, mostly for log lines and CLI output.
    pub fn code(&self) -> &str {
        match self {
            Self::Unavailable { .. } => "UNAVAILABLE",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Rejected { code, .. } => code,
            Self::Decode { .. } => "DECODE_ERROR",
            Self::Io { .. } => "LOCAL_IO",
        }
    }

    #[track_caller]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timeout(after_ms: u64) -> Self {
        Self::Timeout {
            after_ms,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rejected {
            code: code.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn io(path: PathBuf, source: std::io::Error) -> Self {
        Self::Io {
            path,
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for BackendError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::decode(source.to_string())
    }
}

pub type BackendResult<T> = StdResult<T, BackendError>;
