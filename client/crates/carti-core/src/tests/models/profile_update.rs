use crate::ProfileUpdate;
use crate::tests::sample_profile;

use proptest::prelude::*;

#[test]
fn given_empty_update_when_is_empty_then_true() {
    assert!(ProfileUpdate::default().is_empty());
    assert!(!ProfileUpdate::default().avatar("x").is_empty());
}

#[test]
fn given_phone_update_when_to_fields_then_only_phone_present() {
    let update = ProfileUpdate::default().phone_number("555-1234");

    let fields = update.to_fields().unwrap();

    assert_eq!(fields.len(), 1);
    assert_eq!(fields["phoneNumber"], "555-1234");
    assert_eq!(update.field_names(), vec![String::from("phoneNumber")]);
}

#[test]
fn given_partial_update_when_applied_then_untouched_fields_preserved() {
    let profile = sample_profile("u1");
    let update = ProfileUpdate::default().full_name("X");

    let merged = update.apply_to(&profile);

    assert_eq!(merged.full_name, "X");
    assert_eq!(merged.id, profile.id);
    assert_eq!(merged.email, profile.email);
    assert_eq!(merged.phone_number, profile.phone_number);
    assert_eq!(merged.created_at, profile.created_at);
}

#[test]
fn given_camel_case_json_when_deserialized_then_fields_set() {
    let update: ProfileUpdate =
        serde_json::from_str(r#"{"fullName":"Ann","dateOfBirth":"02/03/2001"}"#).unwrap();

    assert_eq!(update.full_name.as_deref(), Some("Ann"));
    assert_eq!(update.date_of_birth.as_deref(), Some("02/03/2001"));
    assert!(update.email.is_none());
}

proptest! {
    #[test]
    fn merged_profile_takes_named_fields_and_keeps_the_rest(
        full_name in proptest::option::of("[A-Za-z ]{1,20}"),
        phone in proptest::option::of("[0-9-]{3,12}"),
        avatar in proptest::option::of("https://[a-z]{1,10}\\.com/[a-z]{1,8}"),
    ) {
        let profile = sample_profile("u1");
        let update = ProfileUpdate {
            full_name: full_name.clone(),
            phone_number: phone.clone(),
            avatar: avatar.clone(),
            ..ProfileUpdate::default()
        };

        let merged = update.apply_to(&profile);

        prop_assert_eq!(&merged.id, &profile.id);
        prop_assert_eq!(&merged.email, &profile.email);
        prop_assert_eq!(&merged.date_of_birth, &profile.date_of_birth);
        prop_assert_eq!(merged.full_name, full_name.unwrap_or(profile.full_name.clone()));
        prop_assert_eq!(merged.phone_number, phone.unwrap_or(profile.phone_number.clone()));
        prop_assert_eq!(merged.avatar, avatar.or(profile.avatar.clone()));
        prop_assert_eq!(update.field_names().len(), update.to_fields().unwrap().len());
    }
}
