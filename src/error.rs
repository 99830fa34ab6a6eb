//! Crate-level error types.
//!
//! [`OverlayError`] unifies every error source (configuration, upstream
//! HTTP, JSON, I/O) behind a single enum so handlers can use the `?`
//! operator and still map each failure to the right HTTP status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::warn;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OverlayError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// An environment variable held a value that could not be used.
    #[error("configuration error: {0}")]
    Config(String),

    /// The game API could not be reached or the transfer failed.
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The game API answered with a status this service does not expect.
    #[error("upstream {endpoint} returned {status}")]
    UpstreamStatus { status: u16, endpoint: String },

    /// The game API rejected the caller's key.
    #[error("API key rejected by upstream")]
    Unauthorized,

    /// The requested item id does not exist.
    #[error("item {0} not found")]
    ItemNotFound(String),

    /// The wallet has no entry for the requested currency.
    #[error("wallet has no entry for currency {0}")]
    WalletCurrencyMissing(u32),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binding or serving the listener failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl OverlayError {
    /// HTTP status reported to the overlay client for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ItemNotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Http(_)
            | Self::UpstreamStatus { .. }
            | Self::WalletCurrencyMissing(_)
            | Self::Json(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for OverlayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "request failed");
        }
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_errors_map_to_client_statuses() {
        assert_eq!(
            OverlayError::ItemNotFound("42".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(OverlayError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn upstream_errors_map_to_bad_gateway() {
        let status = OverlayError::UpstreamStatus {
            status: 503,
            endpoint: "/v2/account/wallet".into(),
        };
        assert_eq!(status.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            OverlayError::WalletCurrencyMissing(1).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn missing_currency_message_names_the_currency() {
        let err = OverlayError::WalletCurrencyMissing(1);
        assert_eq!(err.to_string(), "wallet has no entry for currency 1");
    }
}
