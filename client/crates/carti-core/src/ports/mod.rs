//! Collaborator boundaries. The synchronizer and services only see these
//! traits; concrete adapters live in `carti-firebase` and `carti-session`.

pub mod document_store;
pub mod identity_provider;
pub mod key_value_cache;
