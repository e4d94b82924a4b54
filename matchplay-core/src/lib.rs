#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod controller;
pub mod engine;
pub mod entities;
pub mod error;
pub mod framework;
pub mod processors;
pub mod utils;

pub use error::MatchError;
