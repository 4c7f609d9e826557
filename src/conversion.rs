//! JSON ↔ value conversion for the admin facade.

use serde_json::{Map, Number, Value as JsonValue};

use crate::error::SqlAdminError;
use crate::results::{CustomDbRow, ResultSet};
use crate::types::{Record, RowValues};

/// Map one JSON value onto a storage class.
///
/// Strings stay text, integers that fit `i64` become `Int`, any other number `Float`,
/// booleans `0`/`1`, null `Null`. Arrays and objects are stored as their JSON text.
#[must_use]
pub fn json_to_row_value(value: &JsonValue) -> RowValues {
    match value {
        JsonValue::Null => RowValues::Null,
        JsonValue::Bool(b) => RowValues::Int(i64::from(*b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => RowValues::Int(i),
            None => n.as_f64().map_or(RowValues::Null, RowValues::Float),
        },
        JsonValue::String(s) => RowValues::Text(s.clone()),
        JsonValue::Array(_) | JsonValue::Object(_) => RowValues::Text(value.to_string()),
    }
}

/// Map a stored value back to JSON. Non-finite floats become null; blobs become an array
/// of byte values.
#[must_use]
pub fn row_value_to_json(value: &RowValues) -> JsonValue {
    match value {
        RowValues::Int(i) => JsonValue::from(*i),
        RowValues::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        RowValues::Text(s) => JsonValue::String(s.clone()),
        RowValues::Null => JsonValue::Null,
        RowValues::Blob(bytes) => JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect()),
    }
}

/// A JSON object as a `Record`, keys in document order.
#[must_use]
pub fn record_from_object(object: &Map<String, JsonValue>) -> Record {
    object
        .iter()
        .map(|(key, value)| (key.clone(), json_to_row_value(value)))
        .collect()
}

/// Like [`record_from_object`] but for an arbitrary value, naming `field` when it is not an
/// object.
///
/// # Errors
/// `MissingField(field)` when `value` is absent or not a JSON object.
pub fn record_from_json(value: Option<&JsonValue>, field: &str) -> Result<Record, SqlAdminError> {
    match value {
        Some(JsonValue::Object(object)) => Ok(record_from_object(object)),
        _ => Err(SqlAdminError::MissingField(field.to_string())),
    }
}

#[must_use]
pub fn row_to_json(row: &CustomDbRow) -> JsonValue {
    let object: Map<String, JsonValue> = row
        .column_names
        .iter()
        .zip(row.values.iter())
        .map(|(name, value)| (name.clone(), row_value_to_json(value)))
        .collect();
    JsonValue::Object(object)
}

/// Rows as an array of objects, column order preserved.
#[must_use]
pub fn result_set_to_json(result_set: &ResultSet) -> JsonValue {
    JsonValue::Array(result_set.results.iter().map(row_to_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_scalars_map_to_storage_classes() {
        assert_eq!(json_to_row_value(&json!(null)), RowValues::Null);
        assert_eq!(json_to_row_value(&json!(true)), RowValues::Int(1));
        assert_eq!(json_to_row_value(&json!(42)), RowValues::Int(42));
        assert_eq!(json_to_row_value(&json!(1.5)), RowValues::Float(1.5));
        assert_eq!(json_to_row_value(&json!("hi")), RowValues::Text("hi".into()));
        assert_eq!(
            json_to_row_value(&json!([1, 2])),
            RowValues::Text("[1,2]".into())
        );
    }

    #[test]
    fn record_keeps_document_order() {
        let payload = json!({"zeta": 1, "alpha": "", "mid": null});
        let record = record_from_json(Some(&payload), "data").unwrap();
        let cols: Vec<&str> = record.columns().collect();
        assert_eq!(cols, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn non_object_is_missing_field() {
        let err = record_from_json(Some(&json!([1])), "where").unwrap_err();
        assert!(matches!(err, SqlAdminError::MissingField(f) if f == "where"));
        assert!(record_from_json(None, "data").is_err());
    }

    #[test]
    fn values_back_to_json() {
        assert_eq!(row_value_to_json(&RowValues::Float(f64::NAN)), json!(null));
        assert_eq!(row_value_to_json(&RowValues::Blob(vec![1, 255])), json!([1, 255]));
        assert_eq!(row_value_to_json(&RowValues::Int(-3)), json!(-3));
    }
}
