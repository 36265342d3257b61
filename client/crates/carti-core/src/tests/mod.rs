mod models;

use crate::Profile;

use chrono::{TimeZone, Utc};

pub(crate) fn sample_profile(uid: &str) -> Profile {
    Profile {
        id: uid.to_string(),
        email: format!("{uid}@example.com"),
        full_name: String::from("Alice Doe"),
        phone_number: String::from("555-0000"),
        date_of_birth: String::from("01/02/1990"),
        avatar: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}
