// src/api.rs
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::FeedConfig;
use crate::error::ApiError;
use crate::feed::providers::strapi::StrapiClient;
use crate::feed::types::MixedFeed;
use crate::feed::{FeedQuery, FeedService};

#[derive(Clone)]
pub struct AppState {
    pub feed: FeedService,
}

impl AppState {
    pub fn new(feed: FeedService) -> Self {
        Self { feed }
    }

    /// State backed by the Strapi client described by `cfg`.
    pub fn from_config(cfg: &FeedConfig) -> Self {
        let client = StrapiClient::new(cfg.cms_api_url.clone())
            .with_media_base(cfg.media_base())
            .with_timeout(cfg.upstream_timeout());
        Self::new(FeedService::new(Arc::new(client), cfg.upstream_timeout()))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/breaking-news/live", get(mixed_feed))
        .route("/news/mixed-feed", get(mixed_feed))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn mixed_feed(
    State(state): State<AppState>,
    Query(q): Query<FeedQuery>,
) -> Result<Json<MixedFeed>, ApiError> {
    let feed = state.feed.mixed_feed(&q).await?;
    Ok(Json(feed))
}
