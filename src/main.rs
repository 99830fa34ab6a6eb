use gw2_overlay::OverlayError;
use gw2_overlay::config::fetch_config;
use gw2_overlay::server::serve;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "gw2_overlay=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), OverlayError> {
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber for logging output.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app_config = fetch_config()?;
    serve(app_config).await
}
