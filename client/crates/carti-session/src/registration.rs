use crate::{Result, SessionError};

use std::sync::LazyLock;

use carti_core::Profile;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const DATE_OF_BIRTH_FORMAT: &str = "%d/%m/%Y";
const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Sign-up form contents.
#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    /// Check the form; the first invalid field is reported.
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(SessionError::validation("fullName", "Full name is required"));
        }
        validate_email(&self.email)?;
        if self.phone_number.trim().is_empty() {
            return Err(SessionError::validation(
                "phoneNumber",
                "Phone number is required",
            ));
        }
        if self.password.is_empty() {
            return Err(SessionError::validation("password", "Password is required"));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(SessionError::validation(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.password != self.confirm_password {
            return Err(SessionError::validation(
                "confirmPassword",
                "Passwords do not match",
            ));
        }
        Ok(())
    }

    /// Initial profile document for the newly created identity.
    pub fn to_profile(&self, uid: &str, created_at: DateTime<Utc>) -> Profile {
        let full_name = self.full_name.trim();
        Profile {
            id: uid.to_string(),
            email: self.email.trim().to_string(),
            full_name: full_name.to_string(),
            phone_number: self.phone_number.trim().to_string(),
            date_of_birth: self.date_of_birth.format(DATE_OF_BIRTH_FORMAT).to_string(),
            avatar: Some(default_avatar_url(full_name)),
            created_at,
        }
    }
}

/// Sign-in form contents.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(SessionError::validation("email", "Email is required"));
        }
        if self.password.is_empty() {
            return Err(SessionError::validation("password", "Password is required"));
        }
        Ok(())
    }
}

pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(SessionError::validation("email", "Email is required"));
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(SessionError::validation("email", "Email is invalid"));
    }
    Ok(())
}

/// Generated initials avatar for `full_name`.
pub fn default_avatar_url(full_name: &str) -> String {
    format!(
        "{AVATAR_BASE_URL}?name={}&size=200&background=random",
        urlencoding::encode(full_name)
    )
}
