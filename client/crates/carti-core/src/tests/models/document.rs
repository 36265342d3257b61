use crate::{Document, Profile};

use serde_json::json;

#[test]
fn given_document_without_uid_when_decode_profile_then_uses_document_key() {
    let fields = json!({
        "email": "bob@example.com",
        "fullName": "Bob",
        "createdAt": "2024-05-01T10:00:00Z"
    });
    let document = Document::new("u42", fields.as_object().unwrap().clone());

    let profile = Profile::from_document(&document).unwrap();

    assert_eq!(profile.id, "u42");
    assert_eq!(profile.full_name, "Bob");
    assert_eq!(profile.phone_number, "");
    assert!(profile.avatar.is_none());
}

#[test]
fn given_document_with_mismatched_uid_when_decode_profile_then_key_wins() {
    let fields = json!({
        "uid": "someone-else",
        "email": "bob@example.com",
        "fullName": "Bob",
        "createdAt": "2024-05-01T10:00:00Z"
    });
    let document = Document::new("u42", fields.as_object().unwrap().clone());

    let profile = Profile::from_document(&document).unwrap();

    assert_eq!(profile.id, "u42");
}

#[test]
fn given_document_missing_required_field_when_decode_then_decode_error() {
    let fields = json!({ "email": "bob@example.com" });
    let document = Document::new("u42", fields.as_object().unwrap().clone());

    let result = Profile::from_document(&document);

    let err = result.unwrap_err();
    assert!(!err.is_transient());
    assert!(err.to_string().contains("u42"));
}
