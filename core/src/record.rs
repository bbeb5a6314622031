//! The canonical per-event structured record
//!
//! A [`LogRecord`] is an insertion-ordered mapping of field names to JSON
//! values, built fresh for every event and discarded after serialization.
//! Ordering rides on `serde_json`'s `preserve_order` feature: a key keeps
//! the position of its first insertion even when a later supplier replaces
//! its value.
//!
//! # Merge Policy
//!
//! `merge` is last-write-wins: a later supplier's value silently replaces an
//! earlier one under the same key. This is the documented override
//! mechanism for suppliers, not an error condition.
//!
//! # Serialization
//!
//! `to_json_line` never fails. A value that cannot be converted to JSON is
//! rendered as its string form with a warning, and a serialization error on
//! the full record falls back to a minimal best-effort line.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

/// Field mapping contributed by one supplier
pub type Fields = Map<String, Value>;

/// Convert any serializable value into a record field value
///
/// Falls back to the `Debug` string form when conversion fails, so a
/// misbehaving value degrades to text instead of losing the field.
pub fn field_value<T: Serialize + std::fmt::Debug>(key: &str, value: T) -> Value {
    match serde_json::to_value(&value) {
        Ok(v) => v,
        Err(e) => {
            warn!(key, error = %e, "field value not serializable, rendering as string");
            Value::String(format!("{:?}", value))
        }
    }
}

/// One assembled log record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogRecord {
    fields: Fields,
}

impl LogRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single field, replacing any existing value under the key
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Merge supplier output into the record, last-write-wins
    pub fn merge(&mut self, fields: Fields) {
        for (key, value) in fields {
            self.fields.insert(key, value);
        }
    }

    /// Look up a field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Number of fields in the record
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in record order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Serialize to a newline-terminated JSON object
    ///
    /// Never fails: on a serialization error the record degrades to a
    /// minimal line carrying the error text under `msg`.
    pub fn to_json_line(&self) -> String {
        match serde_json::to_string(&self.fields) {
            Ok(mut line) => {
                line.push('\n');
                line
            }
            Err(e) => {
                warn!(error = %e, "record serialization failed, emitting fallback line");
                let mut fallback = Map::new();
                fallback.insert(
                    crate::record_keys::MESSAGE.to_string(),
                    Value::String(format!("record serialization failed: {}", e)),
                );
                // A flat map of string values cannot fail to serialize
                let line = serde_json::to_string(&fallback)
                    .unwrap_or_else(|_| String::from("{}"));
                format!("{}\n", line)
            }
        }
    }
}

impl From<LogRecord> for Fields {
    fn from(record: LogRecord) -> Self {
        record.fields
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    // ==========================================================================
    // Merge semantics
    // ==========================================================================

    #[test]
    fn test_merge_last_write_wins() {
        let mut record = LogRecord::new();
        record.merge(fields(&[("tenant", json!("alpha"))]));
        record.merge(fields(&[("tenant", json!("beta"))]));
        assert_eq!(record.get("tenant"), Some(&json!("beta")));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_merge_preserves_first_insertion_position() {
        let mut record = LogRecord::new();
        record.merge(fields(&[("a", json!(1)), ("b", json!(2))]));
        record.merge(fields(&[("a", json!(9)), ("c", json!(3))]));

        let keys: Vec<&str> = record.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(record.get("a"), Some(&json!(9)));
    }

    #[test]
    fn test_merge_keeps_disjoint_fields() {
        let mut record = LogRecord::new();
        record.merge(fields(&[("x", json!(true))]));
        record.merge(fields(&[("y", json!("z"))]));
        assert_eq!(record.len(), 2);
    }

    // ==========================================================================
    // Serialization
    // ==========================================================================

    #[test]
    fn test_to_json_line_is_newline_terminated() {
        let mut record = LogRecord::new();
        record.insert("msg", json!("hello"));
        let line = record.to_json_line();
        assert!(line.ends_with('\n'));
        assert_eq!(line.trim_end(), r#"{"msg":"hello"}"#);
    }

    #[test]
    fn test_to_json_line_preserves_field_order() {
        let mut record = LogRecord::new();
        record.insert("timestamp", json!("t"));
        record.insert("level", json!("INFO"));
        record.insert("logger", json!("app"));
        record.insert("msg", json!("m"));
        assert_eq!(
            record.to_json_line().trim_end(),
            r#"{"timestamp":"t","level":"INFO","logger":"app","msg":"m"}"#
        );
    }

    #[test]
    fn test_empty_record_serializes_to_empty_object() {
        assert_eq!(LogRecord::new().to_json_line(), "{}\n");
    }

    // ==========================================================================
    // field_value fallback
    // ==========================================================================

    #[test]
    fn test_field_value_plain() {
        assert_eq!(field_value("n", 7), json!(7));
        assert_eq!(field_value("s", "x"), json!("x"));
    }

    #[test]
    fn test_field_value_unserializable_falls_back_to_string() {
        #[derive(Debug)]
        struct Opaque;

        impl Serialize for Opaque {
            fn serialize<S: serde::Serializer>(&self, _s: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("refuses serialization"))
            }
        }

        let v = field_value("bad", Opaque);
        assert_eq!(v, json!("Opaque"));
    }
}
