//! Error types for record canonicalization.

/// Reasons a value cannot be turned into a [`Record`](crate::Record).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanonError {
    /// The mapping has no entries.
    #[error("record must not be empty")]
    EmptyRecord,

    /// The input text is not JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The input is not a key/value mapping.
    #[error("record must be a mapping, got {found}")]
    NotAMapping {
        /// JSON kind of the rejected input.
        found: &'static str,
    },

    /// A value is an array or nested mapping.
    #[error("value for key {key:?} must be a string, number, boolean or null")]
    NonScalarValue {
        /// Key holding the rejected value.
        key: String,
    },
}
