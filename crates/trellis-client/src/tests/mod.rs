//! Tests for the trellis-client crate, run against an in-memory log service.

mod helpers;

mod admin;
mod queue;
