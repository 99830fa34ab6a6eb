//! Shared test utilities: a fake game API, a mock upstream server and
//! helpers that serve the overlay router on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use num_format::Locale;
use reqwest::Url;
use tokio::net::TcpListener;

use gw2_overlay::api::GameApi;
use gw2_overlay::config::{AppConfig, DeploymentInfo, ServerConfig, UpstreamConfig};
use gw2_overlay::models::{GOLD_CURRENCY_ID, Item, PriceQuote, WalletEntry};
use gw2_overlay::server::build_router;
use gw2_overlay::{OverlayError, Result};

pub const WALLET_JSON: &str = include_str!("../fixtures/wallet.json");
pub const ITEM_JSON: &str = include_str!("../fixtures/item.json");
pub const PRICE_JSON: &str = include_str!("../fixtures/price.json");
pub const PRICES_LIST_JSON: &str = include_str!("../fixtures/prices_list.json");
pub const PRICE_BUYS_ONLY_JSON: &str = include_str!("../fixtures/price_buys_only.json");

const PRICE_BUYS_ONLY_LIST_JSON: &str = r#"[
  {
    "id": 24277,
    "whitelisted": true,
    "buys": { "quantity": 310, "unit_price": 200000 },
    "sells": { "quantity": 0, "unit_price": 0 }
  }
]"#;

/// API key the mock upstream accepts.
pub const GOOD_KEY: &str = "good-key";

/// In-memory [`GameApi`] with canned answers.
#[derive(Clone, Default)]
pub struct FakeApi {
    pub wallet: Vec<WalletEntry>,
    pub items: HashMap<String, Item>,
    pub prices: HashMap<String, PriceQuote>,
    /// When set, every lookup fails as if the game API were down.
    pub unavailable: bool,
    /// When set, `wallet` rejects every key after yielding once, so any
    /// concurrent item lookup settles first.
    pub reject_keys: bool,
    /// Keys passed to `wallet`, in call order.
    pub seen_keys: Arc<Mutex<Vec<String>>>,
}

impl FakeApi {
    pub fn with_gold(copper: u64) -> Self {
        Self {
            wallet: vec![
                WalletEntry { currency_id: 2, amount: 5_000 },
                WalletEntry { currency_id: GOLD_CURRENCY_ID, amount: copper },
            ],
            ..Self::default()
        }
    }

    pub fn with_item(mut self, id: &str, name: &str, quote: Option<PriceQuote>) -> Self {
        self.items.insert(
            id.to_string(),
            Item {
                id: id.parse().unwrap_or_default(),
                name: name.to_string(),
                icon: format!("https://render.guildwars2.com/file/{id}.png"),
            },
        );
        if let Some(quote) = quote {
            self.prices.insert(id.to_string(), quote);
        }
        self
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable {
            return Err(OverlayError::UpstreamStatus {
                status: 503,
                endpoint: "/v2".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl GameApi for FakeApi {
    async fn wallet(&self, api_key: &str) -> Result<Vec<WalletEntry>> {
        self.check_available()?;
        self.seen_keys.lock().unwrap().push(api_key.to_string());
        if self.reject_keys {
            tokio::task::yield_now().await;
            return Err(OverlayError::Unauthorized);
        }
        Ok(self.wallet.clone())
    }

    async fn item(&self, item_id: &str) -> Result<Item> {
        self.check_available()?;
        self.items
            .get(item_id)
            .cloned()
            .ok_or_else(|| OverlayError::ItemNotFound(item_id.to_string()))
    }

    async fn prices(&self, item_id: &str) -> Result<Option<PriceQuote>> {
        self.check_available()?;
        Ok(self.prices.get(item_id).copied())
    }
}

pub fn quote(buy: Option<u64>, sell: Option<u64>) -> PriceQuote {
    PriceQuote {
        buy_unit_price: buy,
        sell_unit_price: sell,
    }
}

pub fn test_config(root_path: &str) -> AppConfig {
    AppConfig {
        deployment: DeploymentInfo {
            version: "1.2.3".into(),
            build: "build-42".into(),
        },
        server: ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            root_path: root_path.to_string(),
            origins: vec!["http://localhost:8800".into()],
            default_locale: Locale::en,
        },
        upstream: UpstreamConfig {
            api_url: Url::parse("http://127.0.0.1:9").unwrap(),
        },
    }
}

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has no address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server failed");
    });
    format!("http://{addr}")
}

/// Serves the overlay router backed by `api`; returns its base URL.
pub async fn spawn_overlay(api: FakeApi, root_path: &str) -> String {
    let router = build_router(&test_config(root_path), Arc::new(api))
        .expect("failed to build router");
    spawn(router).await
}

/// Serves a stand-in for the game API; returns its base URL.
///
/// Knows item 19976 (tradeable, single-object price body), item 24277
/// (array price body with buys only), item 12345 (not tradeable, prices
/// answer 404) and prices for 555 (empty array).
pub async fn spawn_upstream() -> String {
    let router = Router::new()
        .route("/v2/account/wallet", get(mock_wallet))
        .route("/v2/items/{id}", get(mock_item))
        .route("/v2/commerce/prices/{id}", get(mock_prices));
    spawn(router).await
}

fn json_body(status: StatusCode, body: &'static str) -> Response {
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

async fn mock_wallet(headers: HeaderMap) -> Response {
    let auth = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    match auth {
        Some(value) if value == format!("Bearer {GOOD_KEY}") => {
            json_body(StatusCode::OK, WALLET_JSON)
        }
        Some("Bearer broken-upstream") => {
            json_body(StatusCode::SERVICE_UNAVAILABLE, r#"{"text":"API not active"}"#)
        }
        Some("Bearer garbled") => json_body(StatusCode::OK, "[{\"id\": 1,"),
        _ => json_body(StatusCode::UNAUTHORIZED, r#"{"text":"Invalid access token"}"#),
    }
}

async fn mock_item(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "19976" => json_body(StatusCode::OK, ITEM_JSON),
        "24277" => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": 24277,
                "name": "Pile of Crystalline Dust",
                "icon": "https://render.guildwars2.com/file/dust.png"
            })),
        )
            .into_response(),
        "12345" => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": 12345,
                "name": "Account Bound Trinket",
                "icon": "https://render.guildwars2.com/file/trinket.png"
            })),
        )
            .into_response(),
        _ => json_body(StatusCode::NOT_FOUND, r#"{"text":"no such id"}"#),
    }
}

async fn mock_prices(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "19976" => json_body(StatusCode::OK, PRICE_JSON),
        "24277" => json_body(StatusCode::OK, PRICE_BUYS_ONLY_LIST_JSON),
        "555" => json_body(StatusCode::OK, "[]"),
        _ => json_body(StatusCode::NOT_FOUND, r#"{"text":"no such id"}"#),
    }
}
