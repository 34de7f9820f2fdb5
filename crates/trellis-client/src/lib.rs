//! Client for Trillian transparency logs.
//!
//! This crate provides:
//!
//! - [`LogConnection`] — a handle on one log: initialization, queueing leaves
//!   and canonical records, the latest signed root, bounded leaf retrieval and
//!   consistency proofs.
//! - [`AdminClient`] — listing, creating, inspecting and deleting logs.
//! - [`RetryPolicy`] — bounded exponential retry of transient RPC failures.
//! - [`ClientError`] — validation, missing-tree and transport failures.
//!
//! Both clients issue one live query per call and never cache service state.
//! Arguments are validated before any RPC is sent.

mod admin;
mod connection;
mod error;
mod leaves;
mod proof;
mod retry;
mod root;

pub use admin::AdminClient;
pub use connection::{ConnectionOptions, LogConnection};
pub use error::ClientError;
pub use retry::RetryPolicy;

#[cfg(test)]
mod tests;
