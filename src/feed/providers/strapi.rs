// src/feed/providers/strapi.rs
use std::time::Duration;

use async_trait::async_trait;
use metrics::histogram;
use reqwest::Client;
use serde_json::Value;

use crate::error::FetchError;
use crate::feed::upstream::{records_from_body, ContentApi, UpstreamRequest};

/// Reads feed records from the Strapi REST API.
#[derive(Clone)]
pub struct StrapiClient {
    base_url: String,
    media_base: String,
    client: Client,
    timeout: Duration,
}

impl StrapiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let media_base = base_url.trim_end_matches("/api").to_string();
        Self {
            base_url,
            media_base,
            client: Client::new(),
            timeout: Duration::from_secs(8),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_media_base(mut self, media_base: impl Into<String>) -> Self {
        self.media_base = media_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport(&self, path: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                path: path.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            FetchError::Transport {
                path: path.to_string(),
                message: e.to_string(),
            }
        }
    }

    async fn fetch_body(&self, req: &UpstreamRequest) -> Result<Value, FetchError> {
        let url = format!("{}{}", self.base_url, req.path);

        let rsp = self
            .client
            .get(&url)
            .query(&req.query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.transport(req.path, e))?;

        let status = rsp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: req.path.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = rsp.bytes().await.map_err(|e| self.transport(req.path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Malformed {
            path: req.path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ContentApi for StrapiClient {
    async fn fetch_records(&self, req: &UpstreamRequest) -> Result<Vec<Value>, FetchError> {
        let t0 = std::time::Instant::now();
        let res = self
            .fetch_body(req)
            .await
            .and_then(|body| records_from_body(req.path, body));

        let outcome = match &res {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        histogram!("feed_upstream_fetch_ms", "path" => req.path, "outcome" => outcome)
            .record(t0.elapsed().as_secs_f64() * 1_000.0);
        res
    }

    fn media_base(&self) -> &str {
        &self.media_base
    }

    fn name(&self) -> &'static str {
        "strapi"
    }
}
