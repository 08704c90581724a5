// src/feed/types.rs
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    /// Case-insensitive parse; unknown labels yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Fields shared by every feed item, regardless of variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBase {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub timestamp: String, // ISO-8601
    pub source: String,
    pub url: String,
    pub image: Option<String>,
    pub image_alt: String,
    pub image_caption: String,
    pub is_pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(flatten)]
    pub base: ItemBase,
    pub severity: Severity,
    pub is_breaking: bool,
    pub upvotes: u64,
    pub downvotes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredItem {
    #[serde(flatten)]
    pub base: ItemBase,
    pub sponsor_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsor_logo: Option<String>,
    /// Raw CMS value: "top", "bottom", "position-N" or anything else.
    pub display_position: String,
    pub impression_count: u64,
    pub click_count: u64,
}

impl SponsoredItem {
    pub fn placement(&self) -> Placement {
        Placement::parse(&self.display_position)
    }
}

/// One entry of the assembled feed. Serialized with a `type` discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FeedItem {
    News(NewsItem),
    Sponsored(SponsoredItem),
}

impl FeedItem {
    pub fn base(&self) -> &ItemBase {
        match self {
            FeedItem::News(n) => &n.base,
            FeedItem::Sponsored(s) => &s.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn is_news(&self) -> bool {
        matches!(self, FeedItem::News(_))
    }

    pub fn is_sponsored(&self) -> bool {
        matches!(self, FeedItem::Sponsored(_))
    }

    /// Only news items can be breaking.
    pub fn is_breaking(&self) -> bool {
        matches!(self, FeedItem::News(n) if n.is_breaking)
    }

    pub fn is_pinned(&self) -> bool {
        self.base().is_pinned
    }
}

/// Where a sponsored item lands in the regular (non-pinned) content list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
    /// 1-based slot from `position-N`, N >= 1.
    Slot(usize),
    /// Anything else; treated like `Bottom`.
    Unrecognized,
}

impl Placement {
    /// Exact match on the CMS strings. `position-0`, overflowing N and
    /// non-numeric suffixes are `Unrecognized`.
    pub fn parse(raw: &str) -> Self {
        static RE_SLOT: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
        let re = RE_SLOT.get_or_init(|| {
            regex::Regex::new(r"^position-(\d+)$").expect("slot regex")
        });

        match raw {
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            other => re
                .captures(other)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .filter(|n| *n >= 1)
                .map(Self::Slot)
                .unwrap_or(Self::Unrecognized),
        }
    }
}

/// Summary projection of a pinned story, used in `meta.pinnedItems`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedSummary {
    pub id: String,
    pub title: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedMeta {
    pub total: usize,
    pub news_count: usize,
    pub sponsored_count: usize,
    pub breaking_count: usize,
    pub pinned_count: usize,
    pub pinned_items: Vec<PinnedSummary>,
}

/// Final payload of the mixed-feed endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixedFeed {
    pub data: Vec<FeedItem>,
    pub pinned_news: Vec<NewsItem>,
    pub meta: FeedMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_parses_cms_strings() {
        assert_eq!(Placement::parse("top"), Placement::Top);
        assert_eq!(Placement::parse("bottom"), Placement::Bottom);
        assert_eq!(Placement::parse("position-3"), Placement::Slot(3));
        assert_eq!(Placement::parse("position-0"), Placement::Unrecognized);
        assert_eq!(Placement::parse("position-x"), Placement::Unrecognized);
        assert_eq!(Placement::parse("Top"), Placement::Unrecognized);
        assert_eq!(Placement::parse(""), Placement::Unrecognized);
        assert_eq!(
            Placement::parse("position-99999999999999999999999"),
            Placement::Unrecognized
        );
    }

    #[test]
    fn severity_parse_is_case_insensitive() {
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse(" low "), Some(Severity::Low));
        assert_eq!(Severity::parse("critical"), None);
    }

    #[test]
    fn feed_item_serializes_with_type_tag_and_camel_case() {
        let item = FeedItem::News(NewsItem {
            base: ItemBase {
                id: "7".into(),
                title: "Road closure".into(),
                summary: None,
                category: Some("Traffic".into()),
                timestamp: "2026-01-01T00:00:00Z".into(),
                source: "Pattaya1".into(),
                url: "#".into(),
                image: None,
                image_alt: String::new(),
                image_caption: String::new(),
                is_pinned: false,
            },
            severity: Severity::High,
            is_breaking: true,
            upvotes: 3,
            downvotes: 0,
        });
        let v = serde_json::to_value(&item).unwrap();
        assert_eq!(v["type"], "news");
        assert_eq!(v["isBreaking"], true);
        assert_eq!(v["isPinned"], false);
        assert_eq!(v["severity"], "high");
        assert!(v["image"].is_null());
        assert!(v.get("summary").is_none());
    }
}
