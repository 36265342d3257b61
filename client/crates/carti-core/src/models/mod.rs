pub mod document;
pub mod identity;
pub mod profile;
pub mod profile_update;
pub mod query;
