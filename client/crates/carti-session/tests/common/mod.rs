#![allow(dead_code, unused_imports)]

pub(crate) mod fake_identity_provider;
pub(crate) mod fake_store;
pub(crate) mod fixtures;
pub(crate) mod memory_cache;

pub use fake_identity_provider::*;
pub use fake_store::*;
pub use fixtures::*;
pub use memory_cache::*;
