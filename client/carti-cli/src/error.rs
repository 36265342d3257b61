use std::panic::Location;

use carti_catalog::CatalogError;
use carti_config::ConfigError;
use carti_core::BackendError;
use carti_session::SessionError;
use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {source} {location}")]
    Config {
        #[source]
        source: ConfigError,
        location: ErrorLocation,
    },

    #[error("Logger error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Backend {
        #[source]
        source: BackendError,
        location: ErrorLocation,
    },

    #[error("{source}\n{hint}")]
    Session {
        #[source]
        source: SessionError,
        hint: &'static str,
    },

    #[error("{source}")]
    Catalog {
        #[source]
        source: CatalogError,
    },

    #[error("Not signed in. Run `carti login` first. {location}")]
    NotSignedIn { location: ErrorLocation },

    #[error("Profile update needs at least one field {location}")]
    EmptyUpdate { location: ErrorLocation },

    #[error("JSON error: {source} {location}")]
    Json {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },
}

impl CliError {
    #[track_caller]
    pub fn logger(message: impl Into<String>) -> Self {
        Self::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_signed_in() -> Self {
        Self::NotSignedIn {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn empty_update() -> Self {
        Self::EmptyUpdate {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for CliError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<BackendError> for CliError {
    #[track_caller]
    fn from(source: BackendError) -> Self {
        Self::Backend {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<SessionError> for CliError {
    fn from(source: SessionError) -> Self {
        let hint = source.recovery_hint();
        Self::Session { source, hint }
    }
}

impl From<CatalogError> for CliError {
    fn from(source: CatalogError) -> Self {
        Self::Catalog { source }
    }
}

impl From<serde_json::Error> for CliError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        Self::Json {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
