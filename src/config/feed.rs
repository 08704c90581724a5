// src/config/feed.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};
use tracing::warn;

// --- env defaults & names ---
pub const DEFAULT_FEED_CONFIG_PATH: &str = "config/feed.toml";
pub const DEFAULT_CMS_API_URL: &str = "http://localhost:1337/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;
pub const MIN_TIMEOUT_MS: u64 = 500;
pub const MAX_TIMEOUT_MS: u64 = 10_000;

pub const ENV_FEED_CONFIG_PATH: &str = "FEED_CONFIG_PATH";
pub const ENV_CMS_API_URL: &str = "CMS_API_URL";
pub const ENV_CMS_MEDIA_URL: &str = "CMS_MEDIA_URL";
pub const ENV_TIMEOUT_MS: &str = "FEED_UPSTREAM_TIMEOUT_MS";

fn default_api_url() -> String {
    DEFAULT_CMS_API_URL.to_string()
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    /// Strapi REST root, e.g. `https://cms.example/api`.
    #[serde(default = "default_api_url")]
    pub cms_api_url: String,
    /// Prefix for relative media URLs. Derived from `cms_api_url` when unset.
    #[serde(default)]
    pub cms_media_url: Option<String>,
    /// Per-adapter upstream timeout, clamped to 500..=10000 ms.
    #[serde(default = "default_timeout_ms")]
    pub upstream_timeout_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            cms_api_url: default_api_url(),
            cms_media_url: None,
            upstream_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl FeedConfig {
    /// File (`FEED_CONFIG_PATH` or `config/feed.toml`, optional) then env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = env::var(ENV_FEED_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FEED_CONFIG_PATH));

        let mut cfg = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        cfg.apply_env(|k| env::var(k).ok());
        Ok(cfg.sanitized())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read feed config at {}: {}", path.display(), e)
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: FeedConfig = toml::from_str(s)?;
        Ok(cfg.sanitized())
    }

    /// Override fields from `lookup` (usually the process env). Unparsable
    /// values are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_CMS_API_URL).filter(|s| !s.trim().is_empty()) {
            self.cms_api_url = url.trim().to_string();
        }
        if let Some(url) = lookup(ENV_CMS_MEDIA_URL).filter(|s| !s.trim().is_empty()) {
            self.cms_media_url = Some(url.trim().to_string());
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.upstream_timeout_ms = ms,
                Err(e) => warn!("Invalid {ENV_TIMEOUT_MS} value {raw:?}: {e}; keeping {}ms", self.upstream_timeout_ms),
            }
        }
    }

    fn sanitized(mut self) -> Self {
        let clamped = self.upstream_timeout_ms.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        if clamped != self.upstream_timeout_ms {
            warn!(
                "upstream timeout {}ms outside {MIN_TIMEOUT_MS}..={MAX_TIMEOUT_MS}, using {clamped}ms",
                self.upstream_timeout_ms
            );
            self.upstream_timeout_ms = clamped;
        }
        self.cms_api_url = self.cms_api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn media_base(&self) -> String {
        match &self.cms_media_url {
            Some(m) => m.trim_end_matches('/').to_string(),
            None => self.cms_api_url.trim_end_matches("/api").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn toml_fields_and_defaults() {
        let cfg = FeedConfig::from_toml_str(r#"cms_api_url = "https://cms.pattaya1.com/api/""#).unwrap();
        assert_eq!(cfg.cms_api_url, "https://cms.pattaya1.com/api");
        assert_eq!(cfg.upstream_timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(cfg.media_base(), "https://cms.pattaya1.com");
    }

    #[test]
    fn timeout_is_clamped() {
        let low = FeedConfig::from_toml_str("upstream_timeout_ms = 1").unwrap();
        let high = FeedConfig::from_toml_str("upstream_timeout_ms = 600000").unwrap();
        assert_eq!(low.upstream_timeout_ms, MIN_TIMEOUT_MS);
        assert_eq!(high.upstream_timeout_ms, MAX_TIMEOUT_MS);
    }

    #[test]
    fn env_overrides_and_bad_values_are_ignored() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_CMS_API_URL, " https://staging.example/api "),
            (ENV_CMS_MEDIA_URL, "https://media.example/"),
            (ENV_TIMEOUT_MS, "soon"),
        ]);
        let mut cfg = FeedConfig::default();
        cfg.apply_env(|k| vars.get(k).map(|v| v.to_string()));
        let cfg = cfg.sanitized();
        assert_eq!(cfg.cms_api_url, "https://staging.example/api");
        assert_eq!(cfg.media_base(), "https://media.example");
        assert_eq!(cfg.upstream_timeout_ms, DEFAULT_TIMEOUT_MS);
    }
}
