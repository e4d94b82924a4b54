//! Shared types for the Matchplay matchmaking server.
//!
//! `objects` holds the JSON request and response bodies exchanged with the
//! server. The `client` feature adds a typed HTTP client on top of them.

pub mod objects;

#[cfg(feature = "client")]
pub mod client;
