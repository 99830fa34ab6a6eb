//! Guild Wars 2 gold overlay service.
//!
//! Serves a transparent HTML overlay for stream layouts that shows the
//! caller's gold balance against a target, optionally the trading post
//! price of an item, and the JSON payload the overlay polls to refresh
//! itself. Numbers are grouped per the caller's `Accept-Language`.

pub mod api;
pub mod config;
pub mod currency;
pub mod error;
pub mod locale;
pub mod models;
pub mod render;
pub mod server;
pub mod tls;

pub use error::{OverlayError, Result};
