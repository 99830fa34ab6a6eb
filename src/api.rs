//! Client for the Guild Wars 2 REST API.
//!
//! [`GameApi`] is the seam between the overlay handlers and the game's
//! account and trading post endpoints; [`Gw2Client`] implements it over
//! HTTPS. Handlers only ever see the trait, so tests can swap in a fake.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::models::{Item, PriceQuote, PriceResponse, WalletEntry};
use crate::tls::build_tls_config;
use crate::{OverlayError, Result};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Lookups the overlay needs from the game API.
#[async_trait]
pub trait GameApi: Send + Sync {
    /// Fetches every currency balance of the account owning `api_key`.
    async fn wallet(&self, api_key: &str) -> Result<Vec<WalletEntry>>;

    /// Fetches an item's name and icon.
    ///
    /// Fails with [`OverlayError::ItemNotFound`] for unknown ids.
    async fn item(&self, item_id: &str) -> Result<Item>;

    /// Fetches the best trading post prices of an item.
    ///
    /// Returns `None` when the item has no listings (untradeable items
    /// answer 404).
    async fn prices(&self, item_id: &str) -> Result<Option<PriceQuote>>;
}

/// [`GameApi`] over HTTPS.
#[derive(Debug, Clone)]
pub struct Gw2Client {
    http: reqwest::Client,
    base_url: Url,
}

impl Gw2Client {
    /// Creates a client rooted at `base_url` (normally
    /// `https://api.guildwars2.com`).
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Config`] if `base_url` cannot carry a path,
    /// or [`OverlayError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: Url) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(OverlayError::Config(format!(
                "API URL {base_url} cannot be used as a base"
            )));
        }

        let http = reqwest::Client::builder()
            .use_preconfigured_tls(build_tls_config())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Joins `segments` onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| OverlayError::Config(format!("API URL {} has no path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs `url` and decodes the body. A 404 yields `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        api_key: Option<&str>,
    ) -> Result<Option<T>> {
        debug!(endpoint = url.path(), "requesting game API");

        let mut request = self.http.get(url.clone());
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await.inspect_err(|e| {
            warn!(endpoint = url.path(), error = %e, "game API unreachable");
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(OverlayError::Unauthorized);
            }
            status if !status.is_success() => {
                warn!(endpoint = url.path(), status = status.as_u16(), "game API error");
                return Err(OverlayError::UpstreamStatus {
                    status: status.as_u16(),
                    endpoint: url.path().to_string(),
                });
            }
            _ => {}
        }

        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

#[async_trait]
impl GameApi for Gw2Client {
    async fn wallet(&self, api_key: &str) -> Result<Vec<WalletEntry>> {
        let url = self.endpoint(&["v2", "account", "wallet"])?;
        let path = url.path().to_string();
        self.get_json(url, Some(api_key))
            .await?
            .ok_or(OverlayError::UpstreamStatus {
                status: StatusCode::NOT_FOUND.as_u16(),
                endpoint: path,
            })
    }

    async fn item(&self, item_id: &str) -> Result<Item> {
        let url = self.endpoint(&["v2", "items", item_id])?;
        self.get_json(url, None)
            .await?
            .ok_or_else(|| OverlayError::ItemNotFound(item_id.to_string()))
    }

    async fn prices(&self, item_id: &str) -> Result<Option<PriceQuote>> {
        let url = self.endpoint(&["v2", "commerce", "prices", item_id])?;
        let response: Option<PriceResponse> = self.get_json(url, None).await?;
        Ok(response.and_then(PriceResponse::into_quote))
    }
}
