//! Pattaya1 mixed feed service: binary entrypoint.
//! Boots the Axum HTTP server with the CMS-backed feed routes and `/metrics`.

use pattaya_feed::{telemetry::Metrics, FeedConfig};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default, JSON when `LOG_FORMAT=json`.
/// Skipped quietly if the runtime already installed a subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pattaya_feed=info,tower_http=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = FeedConfig::load()?;
    tracing::info!(
        cms = %cfg.cms_api_url,
        timeout_ms = cfg.upstream_timeout_ms,
        "feed config loaded"
    );

    let metrics = Metrics::init(cfg.upstream_timeout_ms)?;
    let router = pattaya_feed::app(&cfg, Some(&metrics));

    Ok(router.into())
}
