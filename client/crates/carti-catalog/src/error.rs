use std::panic::Location;

use carti_core::BackendError;
use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog unavailable: {source} {location}")]
    Backend {
        #[source]
        source: BackendError,
        location: ErrorLocation,
    },

    #[error("Malformed {collection}/{id}: {message} {location}")]
    Decode {
        collection: &'static str,
        id: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Unknown featured list '{name}' {location}")]
    UnknownFeaturedList { name: String, location: ErrorLocation },
}

impl CatalogError {
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Backend { source, .. } => source.is_transient(),
            Self::Decode { .. } | Self::UnknownFeaturedList { .. } => false,
        }
    }

    #[track_caller]
    pub fn backend(source: BackendError) -> Self {
        Self::Backend {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(collection: &'static str, id: impl Into<String>, source: BackendError) -> Self {
        Self::Decode {
            collection,
            id: id.into(),
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unknown_featured_list(name: impl Into<String>) -> Self {
        Self::UnknownFeaturedList {
            name: name.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
