// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::FeedConfig;
pub use crate::error::{ApiError, FetchError};
pub use crate::feed::types::{FeedItem, MixedFeed, NewsItem, SponsoredItem};
pub use crate::feed::{FeedQuery, FeedService};

use axum::Router;

/// Full application router for `cfg`: feed routes plus `/metrics` when a
/// recorder is supplied.
pub fn app(cfg: &FeedConfig, metrics: Option<&telemetry::Metrics>) -> Router {
    let state = AppState::from_config(cfg);
    let router = api::router(state);
    match metrics {
        Some(m) => router.merge(m.router()),
        None => router,
    }
}
