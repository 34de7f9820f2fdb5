//! Caller-supplied records before canonicalization.

use std::collections::BTreeMap;

use serde_json::{Number, Value};

use crate::error::CanonError;

/// A scalar record value.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer or finite float.
    Number(Number),
    /// UTF-8 text.
    Text(String),
}

impl RecordValue {
    /// Build a number value from a float. Returns `None` for NaN or infinities.
    pub fn float(value: f64) -> Option<Self> {
        Number::from_f64(value).map(Self::Number)
    }

    /// The lossy textual form every value is coerced to before encoding.
    ///
    /// Text is kept verbatim; numbers, booleans and null use their JSON
    /// spelling (`42`, `1.5`, `true`, `null`).
    ///
    /// Producers that stringified booleans and null in another spelling
    /// (`True`, `None`) encode those values to different bytes, and so to
    /// different leaf identities. Text and integer values are unaffected.
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    fn kind(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for RecordValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for RecordValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for RecordValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl TryFrom<&Value> for RecordValue {
    type Error = ();

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => Ok(Self::Number(n.clone())),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(()),
        }
    }
}

/// A non-empty mapping of string keys to scalar values.
///
/// Entries are held in key order, so insertion order never affects encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entries: BTreeMap<String, RecordValue>,
}

impl Record {
    /// Build a record from key/value pairs. Later duplicates replace earlier ones.
    pub fn new<K, V, I>(entries: I) -> Result<Self, CanonError>
    where
        K: Into<String>,
        V: Into<RecordValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let entries: BTreeMap<String, RecordValue> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if entries.is_empty() {
            return Err(CanonError::EmptyRecord);
        }
        Ok(Self { entries })
    }

    /// Convert a JSON value at the caller boundary.
    ///
    /// Rejects anything that is not an object, empty objects, and objects
    /// holding arrays or nested objects.
    pub fn from_json(value: &Value) -> Result<Self, CanonError> {
        let Value::Object(map) = value else {
            return Err(CanonError::NotAMapping {
                found: RecordValue::kind(value),
            });
        };
        if map.is_empty() {
            return Err(CanonError::EmptyRecord);
        }

        let mut entries = BTreeMap::new();
        for (key, value) in map {
            let value = RecordValue::try_from(value)
                .map_err(|()| CanonError::NonScalarValue { key: key.clone() })?;
            entries.insert(key.clone(), value);
        }
        Ok(Self { entries })
    }

    /// Parse JSON text and convert it with [`Record::from_json`].
    pub fn from_json_str(text: &str) -> Result<Self, CanonError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| CanonError::InvalidJson(e.to_string()))?;
        Self::from_json(&value)
    }

    /// Number of entries (always at least one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.entries.get(key)
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, &RecordValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl TryFrom<&Value> for Record {
    type Error = CanonError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json_accepts_scalars() {
        let record = Record::from_json(&json!({
            "name": "alice",
            "age": 41,
            "ratio": 0.5,
            "admin": false,
            "nickname": null,
        }))
        .unwrap();

        assert_eq!(record.len(), 5);
        assert_eq!(record.get("name"), Some(&RecordValue::Text("alice".into())));
        assert_eq!(record.get("admin"), Some(&RecordValue::Bool(false)));
        assert_eq!(record.get("nickname"), Some(&RecordValue::Null));
    }

    #[test]
    fn test_from_json_rejects_non_mapping() {
        assert_eq!(
            Record::from_json(&json!([1, 2])),
            Err(CanonError::NotAMapping { found: "array" })
        );
        assert_eq!(
            Record::from_json(&json!("text")),
            Err(CanonError::NotAMapping { found: "string" })
        );
    }

    #[test]
    fn test_from_json_rejects_empty() {
        assert_eq!(Record::from_json(&json!({})), Err(CanonError::EmptyRecord));
    }

    #[test]
    fn test_from_json_rejects_nested_values() {
        let err = Record::from_json(&json!({"ok": 1, "inner": {"x": 1}})).unwrap_err();
        assert_eq!(
            err,
            CanonError::NonScalarValue {
                key: "inner".into()
            }
        );
    }

    #[test]
    fn test_from_json_str_rejects_invalid_json() {
        match Record::from_json_str("{not json") {
            Err(CanonError::InvalidJson(message)) => {
                assert!(message.contains("line 1 column 2"), "{message}");
            }
            other => panic!("expected InvalidJson, got {other:?}"),
        }
        assert_eq!(
            Record::from_json_str("[1]"),
            Err(CanonError::NotAMapping { found: "array" })
        );
    }

    #[test]
    fn test_new_rejects_empty() {
        let empty: Vec<(String, RecordValue)> = Vec::new();
        assert_eq!(Record::new(empty), Err(CanonError::EmptyRecord));
    }

    #[test]
    fn test_to_text_coercion() {
        assert_eq!(RecordValue::from(7i64).to_text(), "7");
        assert_eq!(RecordValue::float(1.5).unwrap().to_text(), "1.5");
        assert_eq!(RecordValue::from(true).to_text(), "true");
        assert_eq!(RecordValue::from(false).to_text(), "false");
        assert_eq!(RecordValue::Null.to_text(), "null");
        assert_eq!(RecordValue::from("x").to_text(), "x");
        assert!(RecordValue::float(f64::NAN).is_none());
    }
}
