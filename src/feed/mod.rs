// src/feed/mod.rs
pub mod assemble;
pub mod fallback;
pub mod normalize;
pub mod providers;
pub mod types;
pub mod upstream;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::FetchError;
use crate::feed::fallback::{Adapter, Degraded};
use crate::feed::types::{MixedFeed, NewsItem, SponsoredItem};
use crate::feed::upstream::{ContentApi, UpstreamRequest};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_requests_total", "Mixed feed assemblies attempted.");
        describe_counter!(
            "feed_upstream_errors_total",
            "Upstream adapter failures by adapter and kind."
        );
        describe_counter!(
            "feed_fallback_total",
            "Degrade policies that substituted placeholder or empty content."
        );
        describe_counter!("feed_items_total", "Items served, by kind.");
        describe_histogram!("feed_assemble_ms", "End-to-end feed assembly time in milliseconds.");
        describe_histogram!("feed_upstream_fetch_ms", "Upstream fetch time in milliseconds.");
    });
}

/// Query parameters accepted by the feed endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    /// Keeps only regular news with a matching `isBreaking` flag.
    #[serde(rename = "IsBreaking", default)]
    pub is_breaking: Option<bool>,
}

/// News Source Adapter.
pub async fn fetch_news(api: &dyn ContentApi) -> Result<Vec<NewsItem>, FetchError> {
    let records = api.fetch_records(&UpstreamRequest::news()).await?;
    Ok(records
        .iter()
        .enumerate()
        .map(|(i, r)| normalize::normalize_news(r, i, api.media_base()))
        .collect())
}

/// Pinned-News Adapter. Order is the server's (newest first).
pub async fn fetch_pinned(api: &dyn ContentApi) -> Result<Vec<NewsItem>, FetchError> {
    let records = api.fetch_records(&UpstreamRequest::pinned()).await?;
    Ok(records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let mut item = normalize::normalize_news(r, i, api.media_base());
            item.base.is_pinned = true;
            item
        })
        .collect())
}

/// Sponsored-Post Adapter.
pub async fn fetch_sponsored(api: &dyn ContentApi) -> Result<Vec<SponsoredItem>, FetchError> {
    let records = api.fetch_records(&UpstreamRequest::sponsored()).await?;
    Ok(records
        .iter()
        .enumerate()
        .map(|(i, r)| normalize::normalize_sponsored(r, i, api.media_base()))
        .collect())
}

/// Runs `fut` under `timeout`; elapsing maps to [`FetchError::Timeout`].
async fn bounded<T, F>(path: &str, timeout: Duration, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => Err(FetchError::Timeout {
            path: path.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

fn record_error<T>(adapter: Adapter, res: &Result<T, FetchError>) {
    if let Err(e) = res {
        tracing::warn!(target: "feed", adapter = adapter.as_str(), kind = e.kind(), error = %e, "upstream adapter failed");
        counter!("feed_upstream_errors_total", "adapter" => adapter.as_str(), "kind" => e.kind())
            .increment(1);
    }
}

fn record_fallback<T>(adapter: Adapter, d: &Degraded<T>) {
    if d.fell_back {
        tracing::warn!(target: "feed", adapter = adapter.as_str(), items = d.items.len(), "degrade policy applied");
        counter!("feed_fallback_total", "adapter" => adapter.as_str()).increment(1);
    }
}

/// Request-scoped mixed feed pipeline over a content API.
#[derive(Clone)]
pub struct FeedService {
    api: Arc<dyn ContentApi>,
    timeout: Duration,
}

impl FeedService {
    pub fn new(api: Arc<dyn ContentApi>, timeout: Duration) -> Self {
        Self { api, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the three sources concurrently, apply the degrade policies,
    /// then assemble and wrap the feed.
    ///
    /// Fails only when the live or pinned payload is malformed.
    pub async fn mixed_feed(&self, query: &FeedQuery) -> Result<MixedFeed, FetchError> {
        ensure_metrics_described();
        counter!("feed_requests_total").increment(1);
        let t0 = Instant::now();
        let api = self.api.as_ref();

        let (news, pinned, sponsored) = tokio::join!(
            bounded(upstream::NEWS_PATH, self.timeout, fetch_news(api)),
            bounded(upstream::PINNED_PATH, self.timeout, fetch_pinned(api)),
            bounded(upstream::SPONSORED_PATH, self.timeout, fetch_sponsored(api)),
        );
        record_error(Adapter::News, &news);
        record_error(Adapter::Pinned, &pinned);
        record_error(Adapter::Sponsored, &sponsored);

        let news = fallback::news_or_fallback(news)?;
        let pinned = fallback::pinned_or_fallback(pinned)?;
        let sponsored = fallback::sponsored_or_empty(sponsored);
        record_fallback(Adapter::News, &news);
        record_fallback(Adapter::Pinned, &pinned);
        record_fallback(Adapter::Sponsored, &sponsored);

        let regular: Vec<NewsItem> = match query.is_breaking {
            Some(flag) => news
                .items
                .into_iter()
                .filter(|n| n.is_breaking == flag)
                .collect(),
            None => news.items,
        };

        let (regular, dropped_news) = assemble::dedup_regular(regular, &pinned.items);
        let (sponsored, dropped_sponsored) =
            assemble::namespace_sponsored(sponsored.items, &pinned.items, &regular);
        if !dropped_news.is_empty() || !dropped_sponsored.is_empty() {
            tracing::debug!(
                target: "feed",
                news = ?dropped_news,
                sponsored = ?dropped_sponsored,
                "duplicate ids dropped"
            );
        }

        let data = assemble::assemble(&regular, &sponsored, &pinned.items);

        let feed = assemble::build_envelope(data, pinned.items);

        counter!("feed_items_total", "kind" => "news").increment(feed.meta.news_count as u64);
        counter!("feed_items_total", "kind" => "sponsored")
            .increment(feed.meta.sponsored_count as u64);
        histogram!("feed_assemble_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        tracing::info!(
            target: "feed",
            upstream = self.api.name(),
            total = feed.meta.total,
            news = feed.meta.news_count,
            sponsored = feed.meta.sponsored_count,
            breaking = feed.meta.breaking_count,
            pinned = feed.meta.pinned_count,
            "mixed feed assembled"
        );

        Ok(feed)
    }
}
