use crate::{Document, Query};

use serde_json::{Value, json};

fn document(id: &str, fields: Value) -> Document {
    Document::new(id, fields.as_object().unwrap().clone())
}

fn ids(documents: &[Document]) -> Vec<&str> {
    documents.iter().map(|d| d.id.as_str()).collect()
}

#[test]
fn given_unordered_documents_when_run_then_sorted_by_order_field() {
    // Given
    let documents = vec![
        document("c", json!({ "order": 3 })),
        document("a", json!({ "order": 1 })),
        document("b", json!({ "order": 2.5 })),
    ];
    let query = Query::collection("bestSellers").order_by("order");

    // When
    let result = query.run(&documents);

    // Then
    assert_eq!(ids(&result), vec!["a", "b", "c"]);
}

#[test]
fn given_equality_filter_when_run_then_only_matching_documents_kept() {
    // Given
    let documents = vec![
        document("on", json!({ "isActive": true, "order": 2 })),
        document("off", json!({ "isActive": false, "order": 1 })),
        document("unset", json!({ "order": 0 })),
    ];
    let query = Query::collection("banners")
        .where_eq("isActive", true)
        .order_by("order");

    // When
    let result = query.run(&documents);

    // Then
    assert_eq!(ids(&result), vec!["on"]);
}

#[test]
fn given_document_without_order_field_when_run_then_left_out() {
    // Given
    let documents = vec![
        document("ranked", json!({ "order": 1 })),
        document("unranked", json!({ "name": "x" })),
    ];

    // When
    let result = Query::collection("recommended").order_by("order").run(&documents);

    // Then
    assert_eq!(ids(&result), vec!["ranked"]);
}

#[test]
fn given_equal_order_values_when_run_then_ties_broken_by_key() {
    // Given
    let documents = vec![
        document("b", json!({ "order": 1 })),
        document("a", json!({ "order": 1 })),
    ];

    // When
    let result = Query::collection("recommended").order_by("order").run(&documents);

    // Then
    assert_eq!(ids(&result), vec!["a", "b"]);
}

#[test]
fn given_no_filter_or_order_when_run_then_every_document_in_key_order() {
    // Given
    let documents = vec![
        document("z", json!({})),
        document("m", json!({ "order": 5 })),
    ];

    // When
    let result = Query::collection("anything").run(&documents);

    // Then
    assert_eq!(ids(&result), vec!["m", "z"]);
}
