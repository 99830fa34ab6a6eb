//! HTTP surface of the overlay: routing, shared state and handlers.
//!
//! - `GET /meta` reports the deployment version and build.
//! - `GET /gold` renders the auto-refreshing HTML overlay.
//! - `GET /gold_data` returns the JSON payload the overlay polls.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use num_format::Locale;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::api::{GameApi, Gw2Client};
use crate::config::AppConfig;
use crate::currency::{resolve_target, to_display_units, wallet_balance};
use crate::locale::{NumberFormatter, parse_accept_language};
use crate::models::{GOLD_CURRENCY_ID, GoldData, GoldDataQuery, GoldQuery, Item, Meta, PriceQuote};
use crate::render::{Overlay, PollParams, gold_data as render_gold_data};
use crate::{OverlayError, Result};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn GameApi>,
    pub meta: Arc<Meta>,
    /// Proxy prefix prepended to URLs generated for the browser.
    pub root_path: Arc<str>,
    pub default_locale: Locale,
}

impl AppState {
    pub fn new(config: &AppConfig, api: Arc<dyn GameApi>) -> Self {
        Self {
            api,
            meta: Arc::new(Meta {
                version: config.deployment.version.clone(),
                build: config.deployment.build.clone(),
            }),
            root_path: Arc::from(config.server.root_path.as_str()),
            default_locale: config.server.default_locale,
        }
    }

    /// Builds the formatter for one request from its `Accept-Language`.
    fn formatter(&self, headers: &HeaderMap) -> NumberFormatter {
        let preferences = headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(parse_accept_language)
            .unwrap_or_default();
        NumberFormatter::from_preferences(&preferences, self.default_locale)
    }

    fn data_path(&self) -> String {
        format!("{}/gold_data", self.root_path)
    }
}

/// Builds the router with CORS and request tracing.
///
/// # Errors
///
/// Returns [`OverlayError::Config`] if a configured origin is not a valid
/// header value.
pub fn build_router(config: &AppConfig, api: Arc<dyn GameApi>) -> Result<Router> {
    let origins = config
        .server
        .origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| OverlayError::Config(format!("invalid origin {origin:?}: {e}")))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    Ok(Router::new()
        .route("/meta", get(meta))
        .route("/gold", get(gold))
        .route("/gold_data", get(gold_data))
        .with_state(AppState::new(config, api))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

/// Binds the configured address and serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the client or router cannot be built, or if
/// binding or serving the listener fails.
pub async fn serve(config: AppConfig) -> Result<()> {
    let api = Arc::new(Gw2Client::new(config.upstream.api_url.clone())?);
    let app = build_router(&config, api)?;

    let listener = TcpListener::bind(config.server.bind_addr).await?;
    info!(
        addr = %listener.local_addr()?,
        version = %config.deployment.version,
        "overlay server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("overlay server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

async fn meta(State(state): State<AppState>) -> Json<Meta> {
    Json(state.meta.as_ref().clone())
}

async fn gold(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GoldQuery>,
) -> Result<Html<String>> {
    let formatter = state.formatter(&headers);
    let item_id = requested_item(query.item.as_deref());

    let (copper, listing) = lookup(state.api.as_ref(), &query.apikey, item_id).await?;
    let current = to_display_units(copper);

    let (label, icon_url, target) = match listing {
        Some((item, quote)) => (
            format!("Gold for {}", item.name),
            Some(item.icon),
            resolve_target(quote.as_ref(), query.target),
        ),
        None => (query.text, None, query.target),
    };
    debug!(current, target, item = ?item_id, "rendering overlay");

    let overlay = Overlay {
        label,
        current,
        target,
        icon_url,
        poll: PollParams {
            apikey: query.apikey.clone(),
            item: item_id.map(String::from),
            target: query.target,
        },
        interval_secs: query.interval,
    };

    Ok(Html(overlay.render_html(&formatter, &state.data_path())?))
}

async fn gold_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GoldDataQuery>,
) -> Result<Json<GoldData>> {
    let formatter = state.formatter(&headers);
    let item_id = requested_item(query.item.as_deref());

    let (copper, listing) = lookup(state.api.as_ref(), &query.apikey, item_id).await?;
    let current = to_display_units(copper);
    let quote = listing.and_then(|(_, quote)| quote);
    let target = resolve_target(quote.as_ref(), query.target);

    Ok(Json(render_gold_data(current, target, &formatter)))
}

/// Treats an empty or blank `item` parameter as absent.
fn requested_item(item: Option<&str>) -> Option<&str> {
    item.map(str::trim).filter(|id| !id.is_empty())
}

/// Fetches the gold balance in copper and, when requested, the item and
/// its prices.
///
/// The lookups run concurrently, but wallet failures (including a missing
/// gold entry) are reported ahead of item failures so the outcome does not
/// depend on which upstream call answers first.
async fn lookup(
    api: &dyn GameApi,
    api_key: &str,
    item_id: Option<&str>,
) -> Result<(u64, Option<(Item, Option<PriceQuote>)>)> {
    let (wallet, listing) = tokio::join!(api.wallet(api_key), item_listing(api, item_id));
    let copper = wallet_balance(&wallet?, GOLD_CURRENCY_ID)?;
    Ok((copper, listing?))
}

async fn item_listing(
    api: &dyn GameApi,
    item_id: Option<&str>,
) -> Result<Option<(Item, Option<PriceQuote>)>> {
    let Some(id) = item_id else {
        return Ok(None);
    };
    let (item, quote) = tokio::try_join!(api.item(id), api.prices(id))?;
    Ok(Some((item, quote)))
}
