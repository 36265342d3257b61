use crate::Profile;
use crate::tests::sample_profile;

use googletest::assert_that;
use googletest::prelude::{eq, some};

#[test]
fn given_profile_when_serialized_then_uses_document_field_names() {
    let profile = sample_profile("u1");

    let json = serde_json::to_value(&profile).unwrap();

    assert_that!(json["uid"].as_str(), some(eq("u1")));
    assert_that!(json["fullName"].as_str(), some(eq("Alice Doe")));
    assert_that!(json["phoneNumber"].as_str(), some(eq("555-0000")));
    assert_that!(json["dateOfBirth"].as_str(), some(eq("01/02/1990")));
    assert!(json.get("avatar").is_none());
}

#[test]
fn given_cached_snapshot_json_when_deserialized_then_matches_original() {
    let mut profile = sample_profile("u1");
    profile.avatar = Some(String::from("https://img.example.com/a.png"));

    let raw = serde_json::to_string(&profile).unwrap();
    let restored: Profile = serde_json::from_str(&raw).unwrap();

    assert_eq!(restored, profile);
}

#[test]
fn given_profile_when_belongs_to_checked_then_compares_uid() {
    let profile = sample_profile("u1");

    assert!(profile.belongs_to("u1"));
    assert!(!profile.belongs_to("u2"));
}

#[test]
fn given_profile_when_to_fields_then_object_with_uid() {
    let fields = sample_profile("u7").to_fields().unwrap();

    assert_that!(fields.get("uid").and_then(|v| v.as_str()), some(eq("u7")));
    assert!(fields.contains_key("createdAt"));
}
