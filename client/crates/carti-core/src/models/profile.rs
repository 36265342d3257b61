//! Profile entity - the user record stored in the `users` collection.

use crate::{BackendResult, Document, Fields};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document field holding the owner's uid.
pub const PROFILE_ID_FIELD: &str = "uid";

/// Authoritative user record. Exactly one exists per identity and its
/// `id` always equals the identity's uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "uid")]
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub phone_number: String,
    /// Display formatted, `dd/mm/yyyy`
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Decode a `users` document. The document key wins over any stored uid.
    pub fn from_document(document: &Document) -> BackendResult<Self> {
        document.decode_with_id(PROFILE_ID_FIELD)
    }

    /// Fields to store for this profile.
    pub fn to_fields(&self) -> BackendResult<Fields> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(fields) => Ok(fields),
            _ => unreachable!("Profile always serializes to an object"),
        }
    }

    pub fn belongs_to(&self, uid: &str) -> bool {
        self.id == uid
    }
}
