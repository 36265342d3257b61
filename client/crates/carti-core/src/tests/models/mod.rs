mod document;
mod profile;
mod profile_update;
mod query;
