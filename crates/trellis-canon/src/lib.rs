//! Canonical encoding of records into log leaf bytes.
//!
//! Inclusion and consistency proofs only mean something if independent
//! producers of the same logical record submit byte-identical leaves. This
//! crate fixes that encoding:
//!
//! - [`Record`] — a non-empty mapping from string keys to scalar
//!   [`RecordValue`]s, validated at construction.
//! - [`CanonicalEncoder`] — coerces every value to text, orders entries by key
//!   according to its [`KeyOrder`], and writes a compact JSON object.
//!
//! ```
//! use trellis_canon::{CanonicalEncoder, Record};
//!
//! let record = Record::from_json(&serde_json::json!({"b": 1, "a": 2})).unwrap();
//! let bytes = CanonicalEncoder::default().normalize(&record);
//! assert_eq!(bytes, br#"{"b":"1","a":"2"}"#);
//! ```

mod encoder;
mod error;
mod record;

pub use encoder::{CanonicalEncoder, KeyOrder};
pub use error::CanonError;
pub use record::{Record, RecordValue};
