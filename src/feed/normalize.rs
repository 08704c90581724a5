// src/feed/normalize.rs
//! Normalization of CMS records into feed items.
//!
//! The CMS answers in two shapes depending on endpoint version: flattened
//! (`{"id": 1, "Title": ".."}`) and wrapped (`{"id": 1, "attributes": {"Title": ".."}}`).
//! Every field has one priority list in [`fields`]; lookup walks all bare keys
//! first, then the same keys under `attributes`. Nulls and empty strings count
//! as missing.

use chrono::{SecondsFormat, TimeZone, Utc};
use serde_json::Value;

use crate::feed::types::{ItemBase, NewsItem, Severity, SponsoredItem};

/// Per-field key priority lists.
pub mod fields {
    pub const ID: &[&str] = &["id", "documentId"];
    pub const TITLE: &[&str] = &["Title", "title"];
    pub const NEWS_SUMMARY: &[&str] = &["Summary", "summary", "Content"];
    pub const SPONSORED_SUMMARY: &[&str] = &["Summary", "summary", "Content", "Description"];
    pub const CATEGORY: &[&str] = &["Category", "category"];
    pub const TIMESTAMP: &[&str] = &["PublishedTimestamp", "publishedAt", "createdAt"];
    pub const SOURCE: &[&str] = &["Source", "source"];
    pub const NEWS_URL: &[&str] = &["URL", "Url", "url", "Link"];
    pub const SPONSORED_URL: &[&str] = &["TargetURL", "URL", "Url", "url", "Link"];
    pub const NEWS_IMAGE: &[&str] = &["Image", "FeaturedImage", "ImageURL"];
    pub const SPONSORED_IMAGE: &[&str] = &["FeaturedImage", "Image", "ImageURL"];
    pub const IMAGE_ALT: &[&str] = &["ImageAlt", "imageAlt"];
    pub const IMAGE_CAPTION: &[&str] = &["ImageCaption", "imageCaption"];
    pub const SEVERITY: &[&str] = &["Severity", "severity"];
    pub const IS_BREAKING: &[&str] = &["IsBreaking", "isBreaking"];
    pub const IS_PINNED: &[&str] = &["isPinned", "IsPinned"];
    pub const UPVOTES: &[&str] = &["upvotes", "Upvotes"];
    pub const DOWNVOTES: &[&str] = &["downvotes", "Downvotes"];
    pub const SPONSOR_NAME: &[&str] = &["Sponsor", "SponsorName"];
    pub const SPONSOR_LOGO: &[&str] = &["SponsorLogo", "sponsorLogo"];
    pub const DISPLAY_POSITION: &[&str] = &["DisplayPosition", "displayPosition"];
    pub const IMPRESSIONS: &[&str] = &["ImpressionCount", "impressionCount"];
    pub const CLICKS: &[&str] = &["ClickCount", "clickCount"];
}

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_NEWS_SOURCE: &str = "Pattaya1";
pub const DEFAULT_URL: &str = "#";
pub const DEFAULT_SPONSOR_NAME: &str = "Sponsored Content";
pub const DEFAULT_SPONSORED_CATEGORY: &str = "Sponsored";
pub const DEFAULT_DISPLAY_POSITION: &str = "bottom";

/// Read-only view over one upstream record.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    raw: &'a Value,
}

impl<'a> Record<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    /// First present value for `keys`: bare keys in order, then `attributes.*`.
    pub fn lookup(&self, keys: &[&str]) -> Option<&'a Value> {
        let nested = self.raw.get("attributes");
        keys.iter()
            .filter_map(|k| self.raw.get(*k))
            .chain(
                keys.iter()
                    .filter_map(move |k| nested.and_then(|a| a.get(*k))),
            )
            .find(|v| is_present(v))
    }

    pub fn text(&self, keys: &[&str]) -> Option<String> {
        self.lookup(keys).and_then(value_to_text)
    }

    pub fn flag(&self, keys: &[&str]) -> Option<bool> {
        self.lookup(keys).and_then(value_to_bool)
    }

    /// Non-negative counter; negative or unparsable values read as 0.
    pub fn count(&self, keys: &[&str]) -> u64 {
        self.lookup(keys).and_then(value_to_count).unwrap_or(0)
    }

    pub fn media(&self, keys: &[&str], media_base: &str) -> Option<String> {
        self.lookup(keys)
            .and_then(media_url)
            .map(|u| absolutize(&u, media_base))
    }

    pub fn timestamp(&self) -> String {
        self.lookup(fields::TIMESTAMP)
            .and_then(value_to_timestamp)
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn value_to_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_to_bool(v: &Value) -> Option<bool> {
    match v {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|x| x != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn value_to_count(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Accepts RFC 3339 strings as-is, and unix milliseconds as numbers.
fn value_to_timestamp(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
        _ => None,
    }
}

/// Media fields arrive as plain URLs or as Strapi media objects
/// (`{url}` flattened, `{data: {attributes: {url}}}` wrapped).
fn media_url(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Object(_) => {
            let candidates = [
                v.get("url"),
                v.pointer("/data/attributes/url"),
                v.pointer("/data/url"),
                v.pointer("/data/0/attributes/url"),
                v.pointer("/data/0/url"),
                v.pointer("/0/url"),
            ];
            candidates
                .into_iter()
                .flatten()
                .find_map(|u| u.as_str().filter(|s| !s.trim().is_empty()))
                .map(|s| s.trim().to_string())
        }
        Value::Array(items) => items.first().and_then(media_url),
        _ => None,
    }
}

fn absolutize(url: &str, media_base: &str) -> String {
    if url.starts_with('/') && !media_base.is_empty() {
        format!("{}{}", media_base.trim_end_matches('/'), url)
    } else {
        url.to_string()
    }
}

fn base_fields(
    rec: &Record<'_>,
    id: String,
    source: String,
    url_keys: &[&str],
    image: Option<String>,
) -> ItemBase {
    ItemBase {
        id,
        title: rec.text(fields::TITLE).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        summary: None,
        category: rec.text(fields::CATEGORY),
        timestamp: rec.timestamp(),
        source,
        url: rec.text(url_keys).unwrap_or_else(|| DEFAULT_URL.to_string()),
        image,
        image_alt: rec.text(fields::IMAGE_ALT).unwrap_or_default(),
        image_caption: rec.text(fields::IMAGE_CAPTION).unwrap_or_default(),
        is_pinned: rec.flag(fields::IS_PINNED).unwrap_or(false),
    }
}

/// Normalize one news record. `index` names records that carry no id.
pub fn normalize_news(raw: &Value, index: usize, media_base: &str) -> NewsItem {
    let rec = Record::new(raw);
    let id = rec
        .text(fields::ID)
        .unwrap_or_else(|| format!("news-{index}"));
    let source = rec
        .text(fields::SOURCE)
        .unwrap_or_else(|| DEFAULT_NEWS_SOURCE.to_string());
    let image = rec.media(fields::NEWS_IMAGE, media_base);

    let mut base = base_fields(&rec, id, source, fields::NEWS_URL, image);
    base.summary = rec.text(fields::NEWS_SUMMARY);

    NewsItem {
        base,
        severity: rec
            .text(fields::SEVERITY)
            .and_then(|s| Severity::parse(&s))
            .unwrap_or_default(),
        is_breaking: rec.flag(fields::IS_BREAKING).unwrap_or(false),
        upvotes: rec.count(fields::UPVOTES),
        downvotes: rec.count(fields::DOWNVOTES),
    }
}

/// Normalize one sponsored-post record. `index` names records that carry no id.
pub fn normalize_sponsored(raw: &Value, index: usize, media_base: &str) -> SponsoredItem {
    let rec = Record::new(raw);
    let id = rec
        .text(fields::ID)
        .unwrap_or_else(|| format!("sponsored-{index}"));
    let sponsor_name = rec
        .text(fields::SPONSOR_NAME)
        .unwrap_or_else(|| DEFAULT_SPONSOR_NAME.to_string());
    let image = rec.media(fields::SPONSORED_IMAGE, media_base);

    let mut base = base_fields(&rec, id, sponsor_name.clone(), fields::SPONSORED_URL, image);
    base.summary = rec.text(fields::SPONSORED_SUMMARY);
    base.category = base
        .category
        .or_else(|| Some(DEFAULT_SPONSORED_CATEGORY.to_string()));
    base.is_pinned = false;

    SponsoredItem {
        base,
        sponsor_name,
        sponsor_logo: rec.media(fields::SPONSOR_LOGO, media_base),
        display_position: rec
            .text(fields::DISPLAY_POSITION)
            .unwrap_or_else(|| DEFAULT_DISPLAY_POSITION.to_string()),
        impression_count: rec.count(fields::IMPRESSIONS),
        click_count: rec.count(fields::CLICKS),
    }
}
