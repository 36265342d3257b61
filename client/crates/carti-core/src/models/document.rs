use crate::{BackendError, BackendResult};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Top-level fields of a stored document.
pub type Fields = Map<String, Value>;

/// A document read from the document store, addressed by its key.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decode the fields into `T` with the document key stored under
    /// `id_field`, replacing any value the fields carry there.
    pub fn decode_with_id<T: DeserializeOwned>(&self, id_field: &str) -> BackendResult<T> {
        let mut fields = self.fields.clone();
        fields.insert(id_field.to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields)).map_err(|e| {
            BackendError::decode(format!("document '{}': {e}", self.id))
        })
    }

    /// Decode the fields into `T` as-is.
    pub fn decode<T: DeserializeOwned>(&self) -> BackendResult<T> {
        serde_json::from_value(Value::Object(self.fields.clone())).map_err(|e| {
            BackendError::decode(format!("document '{}': {e}", self.id))
        })
    }
}
