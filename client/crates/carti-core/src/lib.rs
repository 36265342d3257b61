//! Shared domain types and collaborator ports for the Carti client.
//!
//! The session synchronizer, the catalog and the Firebase adapters all speak
//! in terms of the types re-exported here.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{BackendError, BackendResult};
pub use models::document::{Document, Fields};
pub use models::identity::Identity;
pub use models::profile::Profile;
pub use models::profile_update::ProfileUpdate;
pub use models::query::Query;
pub use ports::document_store::DocumentStore;
pub use ports::identity_provider::{IdentityProvider, SessionEvents};
pub use ports::key_value_cache::KeyValueCache;

/// Collection holding one profile document per identity, keyed by uid.
pub const USERS_COLLECTION: &str = "users";

#[cfg(test)]
mod tests;
