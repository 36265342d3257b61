use crate::{Document, Fields};

use std::cmp::Ordering;

use serde_json::Value;

/// A collection read: every document of `collection`, optionally narrowed to
/// those whose top-level `field` equals a value, in ascending order of a
/// top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filter: Option<(String, Value)>,
    pub order_by: Option<String>,
}

impl Query {
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filter: None,
            order_by: None,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    /// Whether a document with `fields` belongs to the result. Documents
    /// without the ordering field are left out, as an ordered remote query
    /// would.
    pub fn matches(&self, fields: &Fields) -> bool {
        let filtered = self
            .filter
            .as_ref()
            .is_none_or(|(field, value)| fields.get(field) == Some(value));
        let ordered = self
            .order_by
            .as_ref()
            .is_none_or(|field| fields.contains_key(field));
        filtered && ordered
    }

    /// Sort matching documents into result order. Ties keep document key
    /// order.
    pub fn sort(&self, documents: &mut [Document]) {
        documents.sort_by(|a, b| {
            let by_field = self.order_by.as_ref().map_or(Ordering::Equal, |field| {
                compare_values(a.fields.get(field), b.fields.get(field))
            });
            by_field.then_with(|| a.id.cmp(&b.id))
        });
    }

    /// Apply the query to an in-memory set of documents.
    pub fn run<'a>(&self, documents: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
        let mut matching: Vec<Document> = documents
            .into_iter()
            .filter(|document| self.matches(&document.fields))
            .cloned()
            .collect();
        self.sort(&mut matching);
        matching
    }
}

/// Numbers sort before strings; values of other kinds compare equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.total_cmp(&b)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Number(_)), Some(Value::String(_))) => Ordering::Less,
        (Some(Value::String(_)), Some(Value::Number(_))) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}
