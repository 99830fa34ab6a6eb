//! Request parameters and JSON payloads of the overlay endpoints.

use serde::{Deserialize, Serialize};

const DEFAULT_TEXT: &str = "Gold";
const DEFAULT_INTERVAL_SECS: u32 = 60;

/// Query string of `GET /gold`.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldQuery {
    /// Game API key, passed through untouched.
    pub apikey: String,
    /// Item whose trading post price becomes the target.
    #[serde(default)]
    pub item: Option<String>,
    /// Label shown before the amounts.
    #[serde(default = "default_text")]
    pub text: String,
    /// Target in gold used when no item price is available.
    #[serde(default)]
    pub target: u64,
    /// Seconds between refreshes of the overlay.
    #[serde(default = "default_interval")]
    pub interval: u32,
}

/// Query string of `GET /gold_data`.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldDataQuery {
    pub apikey: String,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub target: u64,
}

/// Body of `GET /meta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub version: String,
    pub build: String,
}

/// Body of `GET /gold_data`: both amounts already formatted for the
/// caller's locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldData {
    pub current: String,
    pub target: String,
}

fn default_text() -> String {
    DEFAULT_TEXT.to_string()
}

fn default_interval() -> u32 {
    DEFAULT_INTERVAL_SECS
}
