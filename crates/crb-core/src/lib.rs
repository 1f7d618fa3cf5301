//! Core domain + application logic for the Chai relay bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the Chai HTTP
//! endpoint live behind ports (traits) implemented in adapter crates.

pub mod activation;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod router;

pub use errors::{Error, Result};
