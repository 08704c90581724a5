// src/feed/fallback.rs
//! Degrade policies applied to adapter results, and the literal datasets
//! they substitute.
//!
//! - live news: outage → six placeholder stories
//! - pinned news: outage or empty → two placeholder pinned stories
//! - sponsored: any failure → no sponsored content
//!
//! A malformed live/pinned payload is not an outage and is passed through.

use crate::error::FetchError;
use crate::feed::types::{ItemBase, NewsItem, Severity, SponsoredItem};

/// Which adapter a policy decision belongs to (logs, metric labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adapter {
    News,
    Pinned,
    Sponsored,
}

impl Adapter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Adapter::News => "news",
            Adapter::Pinned => "pinned",
            Adapter::Sponsored => "sponsored",
        }
    }
}

/// Outcome of a degrade policy: the items to use and whether they were substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degraded<T> {
    pub items: Vec<T>,
    pub fell_back: bool,
}

impl<T> Degraded<T> {
    fn live(items: Vec<T>) -> Self {
        Self {
            items,
            fell_back: false,
        }
    }

    fn substituted(items: Vec<T>) -> Self {
        Self {
            items,
            fell_back: true,
        }
    }
}

pub fn news_or_fallback(res: Result<Vec<NewsItem>, FetchError>) -> Result<Degraded<NewsItem>, FetchError> {
    match res {
        Ok(items) => Ok(Degraded::live(items)),
        Err(e) if e.is_unavailable() => Ok(Degraded::substituted(fallback_news())),
        Err(e) => Err(e),
    }
}

pub fn pinned_or_fallback(
    res: Result<Vec<NewsItem>, FetchError>,
) -> Result<Degraded<NewsItem>, FetchError> {
    match res {
        Ok(items) if !items.is_empty() => Ok(Degraded::live(items)),
        Ok(_) => Ok(Degraded::substituted(fallback_pinned())),
        Err(e) if e.is_unavailable() => Ok(Degraded::substituted(fallback_pinned())),
        Err(e) => Err(e),
    }
}

pub fn sponsored_or_empty(res: Result<Vec<SponsoredItem>, FetchError>) -> Degraded<SponsoredItem> {
    match res {
        Ok(items) => Degraded::live(items),
        Err(_) => Degraded::substituted(Vec::new()),
    }
}

#[allow(clippy::too_many_arguments)]
fn placeholder(
    id: &str,
    title: &str,
    summary: &str,
    category: &str,
    severity: Severity,
    is_breaking: bool,
    is_pinned: bool,
    timestamp: &str,
    votes: (u64, u64),
) -> NewsItem {
    NewsItem {
        base: ItemBase {
            id: id.to_string(),
            title: title.to_string(),
            summary: Some(summary.to_string()),
            category: Some(category.to_string()),
            timestamp: timestamp.to_string(),
            source: "Pattaya1".to_string(),
            url: "#".to_string(),
            image: None,
            image_alt: String::new(),
            image_caption: String::new(),
            is_pinned,
        },
        severity,
        is_breaking,
        upvotes: votes.0,
        downvotes: votes.1,
    }
}

/// Six placeholder live stories, none pinned.
pub fn fallback_news() -> Vec<NewsItem> {
    vec![
        placeholder(
            "fallback-1",
            "Heavy rain causes flooding on Beach Road",
            "Motorists are advised to avoid Beach Road between Soi 6 and Soi 13 while drains clear.",
            "Weather",
            Severity::High,
            true,
            false,
            "2025-01-15T09:55:00Z",
            (24, 1),
        ),
        placeholder(
            "fallback-2",
            "Traffic diverted on Sukhumvit Road for bridge works",
            "Northbound lanes near the Central Pattaya junction are closed overnight until Friday.",
            "Traffic",
            Severity::Medium,
            true,
            false,
            "2025-01-15T09:45:00Z",
            (11, 0),
        ),
        placeholder(
            "fallback-3",
            "Walking Street festival weekend announced",
            "Live music stages and food stalls will run from Friday evening through Sunday.",
            "Events",
            Severity::Low,
            false,
            false,
            "2025-01-15T09:28:00Z",
            (38, 2),
        ),
        placeholder(
            "fallback-4",
            "Ferry schedule to Koh Larn extended for high season",
            "Bali Hai pier adds late departures every hour until 20:00.",
            "Travel",
            Severity::Low,
            false,
            false,
            "2025-01-15T09:12:00Z",
            (17, 0),
        ),
        placeholder(
            "fallback-5",
            "Power outage planned for Jomtien Second Road",
            "The provincial electricity authority will cut supply from 09:00 to 15:00 for maintenance.",
            "Local",
            Severity::Medium,
            true,
            false,
            "2025-01-15T08:45:00Z",
            (9, 3),
        ),
        placeholder(
            "fallback-6",
            "New night market opens in Naklua",
            "More than 200 vendors open at the former Naklua fish market site every evening.",
            "Lifestyle",
            Severity::Low,
            false,
            false,
            "2025-01-15T08:00:00Z",
            (42, 1),
        ),
    ]
}

/// Two placeholder pinned stories.
pub fn fallback_pinned() -> Vec<NewsItem> {
    vec![
        placeholder(
            "pinned-fallback-1",
            "Emergency hotlines for Pattaya residents and visitors",
            "Tourist Police 1155, ambulance 1669, fire 199. Save these numbers before you travel.",
            "Safety",
            Severity::High,
            false,
            true,
            "2025-01-15T09:50:00Z",
            (156, 0),
        ),
        placeholder(
            "pinned-fallback-2",
            "Pattaya City Hall service hours this month",
            "Counters open 08:30-16:30 on weekdays; online requests are processed within two days.",
            "Announcements",
            Severity::Medium,
            false,
            true,
            "2025-01-15T09:00:00Z",
            (64, 2),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outage() -> FetchError {
        FetchError::Transport {
            path: "/breaking-news/live".into(),
            message: "connection refused".into(),
        }
    }

    fn malformed() -> FetchError {
        FetchError::Malformed {
            path: "/breaking-news/live".into(),
            message: "`data` is not an array".into(),
        }
    }

    #[test]
    fn news_outage_yields_six_unpinned_placeholders() {
        let d = news_or_fallback(Err(outage())).unwrap();
        assert!(d.fell_back);
        let ids: Vec<_> = d.items.iter().map(|n| n.base.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["fallback-1", "fallback-2", "fallback-3", "fallback-4", "fallback-5", "fallback-6"]
        );
        assert!(d.items.iter().all(|n| !n.base.is_pinned));
    }

    #[test]
    fn fallback_datasets_are_literal() {
        assert_eq!(fallback_news(), fallback_news());
        assert_eq!(fallback_pinned(), fallback_pinned());
        assert_eq!(fallback_news()[0].base.timestamp, "2025-01-15T09:55:00Z");
        assert!(fallback_news()
            .iter()
            .chain(&fallback_pinned())
            .all(|n| chrono::DateTime::parse_from_rfc3339(&n.base.timestamp).is_ok()));
    }

    #[test]
    fn news_timeout_and_status_also_fall_back() {
        let timeout = FetchError::Timeout {
            path: "/x".into(),
            timeout_ms: 10,
        };
        let status = FetchError::Status {
            path: "/x".into(),
            status: 503,
        };
        assert_eq!(news_or_fallback(Err(timeout)).unwrap().items.len(), 6);
        assert_eq!(news_or_fallback(Err(status)).unwrap().items.len(), 6);
    }

    #[test]
    fn news_malformed_payload_is_not_absorbed() {
        assert_eq!(news_or_fallback(Err(malformed())), Err(malformed()));
    }

    #[test]
    fn news_empty_success_is_kept_empty() {
        let d = news_or_fallback(Ok(vec![])).unwrap();
        assert!(d.items.is_empty());
        assert!(!d.fell_back);
    }

    #[test]
    fn pinned_empty_or_outage_yields_two_pinned_placeholders() {
        for res in [Ok(vec![]), Err(outage())] {
            let d = pinned_or_fallback(res).unwrap();
            assert!(d.fell_back);
            assert_eq!(d.items.len(), 2);
            assert!(d.items.iter().all(|n| n.base.is_pinned));
        }
    }

    #[test]
    fn sponsored_any_failure_is_empty() {
        assert!(sponsored_or_empty(Err(outage())).items.is_empty());
        assert!(sponsored_or_empty(Err(malformed())).fell_back);
    }
}
