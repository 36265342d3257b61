use crate::{BackendResult, Fields, Profile};

use serde::{Deserialize, Serialize};

/// Partial profile change. Only `Some` fields are written; the identity
/// and creation time are not updatable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.full_name.is_none()
            && self.phone_number.is_none()
            && self.date_of_birth.is_none()
            && self.avatar.is_none()
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    pub fn date_of_birth(mut self, date_of_birth: impl Into<String>) -> Self {
        self.date_of_birth = Some(date_of_birth.into());
        self
    }

    pub fn avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Names of the fields this update touches, in document naming.
    pub fn field_names(&self) -> Vec<String> {
        self.to_fields()
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Only the named fields, ready for a merge write.
    pub fn to_fields(&self) -> BackendResult<Fields> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(fields) => Ok(fields),
            _ => unreachable!("ProfileUpdate always serializes to an object"),
        }
    }

    /// The profile with this update merged in; untouched fields are kept.
    pub fn apply_to(&self, profile: &Profile) -> Profile {
        let mut merged = profile.clone();
        if let Some(ref email) = self.email {
            merged.email = email.clone();
        }
        if let Some(ref full_name) = self.full_name {
            merged.full_name = full_name.clone();
        }
        if let Some(ref phone_number) = self.phone_number {
            merged.phone_number = phone_number.clone();
        }
        if let Some(ref date_of_birth) = self.date_of_birth {
            merged.date_of_birth = date_of_birth.clone();
        }
        if let Some(ref avatar) = self.avatar {
            merged.avatar = Some(avatar.clone());
        }
        merged
    }
}
