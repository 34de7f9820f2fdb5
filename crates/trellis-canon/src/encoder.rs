//! Record → leaf bytes.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CanonError;
use crate::record::{Record, RecordValue};

/// Order in which record entries are written.
///
/// Keys compare byte-wise on their UTF-8 encoding. Every producer writing to
/// the same log must use the same order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrder {
    /// Largest key first. Matches leaves already written by existing producers.
    #[default]
    Descending,
    /// Smallest key first.
    Ascending,
}

/// Deterministic record encoder.
///
/// Output is a compact JSON object whose values are the textual form of each
/// record value (see [`RecordValue::to_text`](crate::RecordValue::to_text)),
/// ordered by key according to [`KeyOrder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalEncoder {
    order: KeyOrder,
}

impl CanonicalEncoder {
    /// Create an encoder with the given key order.
    pub fn new(order: KeyOrder) -> Self {
        Self { order }
    }

    /// The key order this encoder writes.
    pub fn order(&self) -> KeyOrder {
        self.order
    }

    /// Encode a record into its canonical bytes.
    pub fn normalize(&self, record: &Record) -> Vec<u8> {
        let mut out = Vec::with_capacity(16 * record.len());
        out.push(b'{');

        let entries: Box<dyn Iterator<Item = (&str, &RecordValue)> + '_> = match self.order {
            KeyOrder::Ascending => Box::new(record.iter()),
            KeyOrder::Descending => Box::new(record.iter().rev()),
        };
        for (i, (key, value)) in entries.enumerate() {
            if i > 0 {
                out.push(b',');
            }
            write_json_string(&mut out, key);
            out.push(b':');
            write_json_string(&mut out, &value.to_text());
        }

        out.push(b'}');
        out
    }

    /// Validate a JSON value as a record and encode it.
    pub fn normalize_json(&self, value: &Value) -> Result<Vec<u8>, CanonError> {
        Ok(self.normalize(&Record::from_json(value)?))
    }
}

/// Append `s` as a JSON string literal.
fn write_json_string(out: &mut Vec<u8>, s: &str) {
    serde_json::to_writer(&mut *out, s).expect("writing a string into a Vec cannot fail");
}
