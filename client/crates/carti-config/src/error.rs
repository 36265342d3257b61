use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("{section} config error: {message} {location}")]
    Invalid {
        section: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Home directory not found")]
    NoHomeDir,
}

impl ConfigError {
    #[track_caller]
    fn invalid<S: Into<String>>(section: &'static str, message: S) -> Self {
        ConfigError::Invalid {
            section,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::invalid("Backend", message)
    }

    #[track_caller]
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::invalid("Cache", message)
    }

    #[track_caller]
    pub fn sync<S: Into<String>>(message: S) -> Self {
        Self::invalid("Sync", message)
    }

    #[track_caller]
    pub fn retry<S: Into<String>>(message: S) -> Self {
        Self::invalid("Retry", message)
    }

    #[track_caller]
    pub fn logging<S: Into<String>>(message: S) -> Self {
        Self::invalid("Logging", message)
    }

    #[track_caller]
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::invalid("General", message)
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
