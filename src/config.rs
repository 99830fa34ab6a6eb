//! Application configuration loaded from environment variables.
//!
//! Every setting is optional:
//! - `VERSION` / `BUILD`: deployment identifiers reported by `/meta`
//! - `ROOT_PATH`: path prefix added by a reverse proxy
//! - `ORIGINS`: comma-separated CORS allow-list of http(s) origins,
//!   falling back to a single origin in `HOSTNAME`
//! - `BIND_ADDR`: listen address
//! - `GW2_API_URL`: base URL of the game API
//! - `DEFAULT_LOCALE`: number formatting locale used when no
//!   `Accept-Language` candidate can be activated

use std::net::SocketAddr;

use num_format::Locale;
use reqwest::Url;
use tracing::debug;

use crate::OverlayError;
use crate::locale::locale_for_tag;

const DEFAULT_VERSION: &str = "UNKNOWN";
const DEFAULT_ORIGIN: &str = "http://localhost:8800";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8800";
const DEFAULT_API_URL: &str = "https://api.guildwars2.com";
const DEFAULT_LOCALE: &str = "en";

/// Top-level application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub deployment: DeploymentInfo,
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

/// Identifiers of the running deployment.
#[derive(Debug, Clone)]
pub struct DeploymentInfo {
    pub version: String,
    pub build: String,
}

/// HTTP listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Prefix without a trailing slash, empty when served at the root.
    pub root_path: String,
    /// Origins allowed by CORS, without trailing slashes.
    pub origins: Vec<String>,
    pub default_locale: Locale,
}

/// Game API settings.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub api_url: Url,
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`OverlayError::Config`] if `ORIGINS`, `BIND_ADDR`,
/// `GW2_API_URL` or `DEFAULT_LOCALE` hold a value that cannot be used.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let version = non_empty_var("VERSION").unwrap_or_else(|| DEFAULT_VERSION.to_string());
    let build = non_empty_var("BUILD").unwrap_or_else(|| DEFAULT_VERSION.to_string());

    let root_path = non_empty_var("ROOT_PATH")
        .map(|p| normalize_root_path(&p))
        .unwrap_or_default();

    let origins = parse_origins(&non_empty_var("ORIGINS").unwrap_or_else(hostname_origin))?;

    let bind_addr = non_empty_var("BIND_ADDR")
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let bind_addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| OverlayError::Config(format!("invalid BIND_ADDR {bind_addr:?}: {e}")))?;

    let api_url = non_empty_var("GW2_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let api_url = parse_http_url(&api_url)
        .map_err(|e| OverlayError::Config(format!("invalid GW2_API_URL: {e}")))?;

    let locale_tag = non_empty_var("DEFAULT_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string());
    let default_locale = locale_for_tag(&locale_tag).ok_or_else(|| {
        OverlayError::Config(format!("unsupported DEFAULT_LOCALE {locale_tag:?}"))
    })?;

    Ok(AppConfig {
        deployment: DeploymentInfo { version, build },
        server: ServerConfig {
            bind_addr,
            root_path,
            origins,
            default_locale,
        },
        upstream: UpstreamConfig { api_url },
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Single origin taken from `HOSTNAME` when `ORIGINS` is unset.
///
/// Container runtimes set `HOSTNAME` to a bare host name, so only values
/// that parse as http(s) URLs are used.
fn hostname_origin() -> String {
    match non_empty_var("HOSTNAME") {
        Some(host) if parse_http_url(&host).is_ok() => host,
        Some(host) => {
            debug!(host = %host, "HOSTNAME is not an origin, using default");
            DEFAULT_ORIGIN.to_string()
        }
        None => DEFAULT_ORIGIN.to_string(),
    }
}

/// `"overlay/"` and `"/overlay"` both become `"/overlay"`; `"/"` becomes empty.
fn normalize_root_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_origins(raw: &str) -> crate::Result<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            parse_http_url(origin)
                .map(|_| origin.trim_end_matches('/').to_string())
                .map_err(|e| OverlayError::Config(format!("invalid origin {origin:?}: {e}")))
        })
        .collect()
}

fn parse_http_url(raw: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {other:?}")),
    }
}
