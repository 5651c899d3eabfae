//! Shared pieces used across Inlet crates.
//!
//! Deliberately small: the logging initializer lives here so every binary and
//! integration test emits into the same sink, plus a couple of constants the
//! acquisition crates agree on.

pub mod observability;

/// User agent sent by the HTTP client.
pub const USER_AGENT: &str = concat!("inlet/", env!("CARGO_PKG_VERSION"));
