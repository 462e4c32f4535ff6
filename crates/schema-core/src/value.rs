//! Synthesized field values and records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One synthesized field value.
///
/// Serializes untagged, so the JSON form is the bare number, string,
/// boolean, or null the wire contract requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// 64-bit signed integer
    Int(i64),
    /// UTF-8 string
    Text(String),
    /// Boolean
    Bool(bool),
    /// Explicit absence, used for fields of unknown type
    Null,
}

impl FieldValue {
    /// Whether this value is the explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// One synthesized instance of a schema, keyed by field name.
///
/// Every schema field has exactly one entry; unknown-typed fields carry
/// [`FieldValue::Null`] rather than omitting the key.
pub type Record = BTreeMap<String, FieldValue>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_serializes_bare() {
        assert_eq!(serde_json::to_value(FieldValue::Int(42)).unwrap(), json!(42));
        assert_eq!(
            serde_json::to_value(FieldValue::Text("test_7".to_string())).unwrap(),
            json!("test_7")
        );
        assert_eq!(
            serde_json::to_value(FieldValue::Bool(true)).unwrap(),
            json!(true)
        );
        assert_eq!(serde_json::to_value(FieldValue::Null).unwrap(), json!(null));
    }

    #[test]
    fn test_field_value_deserializes_from_bare() {
        let parsed: FieldValue = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(parsed, FieldValue::Int(7));

        let parsed: FieldValue = serde_json::from_value(json!("x")).unwrap();
        assert_eq!(parsed, FieldValue::Text("x".to_string()));

        let parsed: FieldValue = serde_json::from_value(json!(false)).unwrap();
        assert_eq!(parsed, FieldValue::Bool(false));

        let parsed: FieldValue = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(parsed, FieldValue::Null);
    }

    #[test]
    fn test_record_round_trips_as_object() {
        let mut record = Record::new();
        record.insert("id".to_string(), FieldValue::Int(1));
        record.insert("name".to_string(), FieldValue::Text("test_1".to_string()));
        record.insert("active".to_string(), FieldValue::Bool(true));
        record.insert("extra".to_string(), FieldValue::Null);

        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: Record = serde_json::from_str(&encoded).unwrap();

        assert_eq!(record, decoded);
    }
}
