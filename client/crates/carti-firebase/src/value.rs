//! Conversion between plain JSON fields and Firestore's typed `Value`
//! encoding (`{"stringValue": "..."}`, `{"mapValue": {"fields": ...}}`, ...).

use carti_core::{BackendError, BackendResult, Fields};
use chrono::DateTime;
use serde_json::{Map, Number, Value, json};

/// Field names whose RFC 3339 string values are stored as
/// `timestampValue`, so they sort and compare as times server-side. Any
/// other string is stored verbatim.
pub const TIMESTAMP_FIELDS: &[&str] = &["createdAt", "updatedAt"];

/// Encode document fields as a Firestore `fields` map.
pub fn encode_fields(fields: &Fields) -> Value {
    let encoded: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.clone(), encode_field(key, value)))
        .collect();
    Value::Object(encoded)
}

/// Encode the value of field `name`.
pub fn encode_field(name: &str, value: &Value) -> Value {
    match value {
        Value::String(s)
            if TIMESTAMP_FIELDS.contains(&name) && DateTime::parse_from_rfc3339(s).is_ok() =>
        {
            json!({ "timestampValue": s })
        }
        _ => encode_value(value),
    }
}

/// Encode one value. Strings always become `stringValue`; timestamps are
/// recognised by field name in [`encode_fields`].
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Decode a Firestore `fields` map. A missing map is an empty document.
pub fn decode_fields(fields: Option<&Value>) -> BackendResult<Fields> {
    let Some(fields) = fields else {
        return Ok(Fields::new());
    };
    let Value::Object(fields) = fields else {
        return Err(BackendError::decode("document fields are not an object"));
    };

    fields
        .iter()
        .map(|(key, value)| {
            decode_value(value)
                .map(|decoded| (key.clone(), decoded))
                .map_err(|e| BackendError::decode(format!("field '{key}': {e}")))
        })
        .collect()
}

pub fn decode_value(value: &Value) -> BackendResult<Value> {
    let Value::Object(typed) = value else {
        return Err(BackendError::decode("typed value is not an object"));
    };
    let Some((kind, inner)) = typed.iter().next() else {
        return Err(BackendError::decode("typed value is empty"));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| BackendError::decode("booleanValue is not a boolean")),
        "integerValue" => decode_integer(inner),
        "doubleValue" => decode_double(inner),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| BackendError::decode(format!("{kind} is not a string"))),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values,
                Some(_) => return Err(BackendError::decode("arrayValue.values is not a list")),
                None => return Ok(Value::Array(Vec::new())),
            };
            values
                .iter()
                .map(decode_value)
                .collect::<BackendResult<Vec<_>>>()
                .map(Value::Array)
        }
        "mapValue" => decode_fields(inner.get("fields")).map(Value::Object),
        other => Err(BackendError::decode(format!("unsupported value type '{other}'"))),
    }
}

/// Integers travel as decimal strings.
fn decode_integer(inner: &Value) -> BackendResult<Value> {
    let parsed = match inner {
        Value::String(s) => s.parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    parsed
        .map(|i| Value::Number(i.into()))
        .ok_or_else(|| BackendError::decode(format!("invalid integerValue {inner}")))
}

/// Doubles are numbers, or the strings `NaN` / `Infinity` / `-Infinity`,
/// which JSON cannot hold and decode to null.
fn decode_double(inner: &Value) -> BackendResult<Value> {
    match inner {
        Value::Number(n) => Ok(n
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Null, Value::Number)),
        Value::String(s) if matches!(s.as_str(), "NaN" | "Infinity" | "-Infinity") => {
            Ok(Value::Null)
        }
        _ => Err(BackendError::decode(format!("invalid doubleValue {inner}"))),
    }
}
