// src/feed/assemble.rs
//! Feed assembly: sponsored insertion by display position, pinned prefix,
//! and the response envelope.

use std::collections::HashSet;

use crate::feed::types::{
    FeedItem, FeedMeta, MixedFeed, NewsItem, PinnedSummary, Placement, SponsoredItem,
};

/// Insert sponsored items into the regular list, one at a time in the
/// order given, then prefix the pinned stories.
///
/// Inserts are sequential: two items both at `position-1` end up as
/// `[second, first, ..]`. Inputs are never modified.
pub fn assemble(
    regular: &[NewsItem],
    sponsored: &[SponsoredItem],
    pinned: &[NewsItem],
) -> Vec<FeedItem> {
    let mut content: Vec<FeedItem> = regular.iter().cloned().map(FeedItem::News).collect();
    content.reserve(sponsored.len());

    for s in sponsored {
        let item = FeedItem::Sponsored(s.clone());
        match s.placement() {
            Placement::Top => content.insert(0, item),
            Placement::Slot(n) if n - 1 < content.len() => content.insert(n - 1, item),
            Placement::Slot(_) | Placement::Bottom | Placement::Unrecognized => content.push(item),
        }
    }

    let mut all = Vec::with_capacity(pinned.len() + content.len());
    all.extend(pinned.iter().cloned().map(FeedItem::News));
    all.extend(content);
    all
}

/// Drop live stories that are already pinned, and repeats within the live
/// list, keeping the first occurrence. Must run before [`assemble`]. Returns
/// the kept stories and the dropped ids.
pub fn dedup_regular(regular: Vec<NewsItem>, pinned: &[NewsItem]) -> (Vec<NewsItem>, Vec<String>) {
    let mut seen: HashSet<String> = pinned.iter().map(|p| p.base.id.clone()).collect();
    let mut dropped = Vec::new();
    let kept = regular
        .into_iter()
        .filter(|n| {
            if seen.insert(n.base.id.clone()) {
                true
            } else {
                dropped.push(n.base.id.clone());
                false
            }
        })
        .collect();
    (kept, dropped)
}

/// Make sponsored ids unique across the whole response.
///
/// A repeated sponsored id is the same CMS record and is dropped. An id that
/// clashes with a news id (pinned or regular) becomes `sponsored-{id}`, with a
/// `-2`, `-3`.. suffix while that is still taken. Returns the kept posts and
/// the dropped ids.
pub fn namespace_sponsored(
    sponsored: Vec<SponsoredItem>,
    pinned: &[NewsItem],
    regular: &[NewsItem],
) -> (Vec<SponsoredItem>, Vec<String>) {
    let mut taken: HashSet<String> = pinned
        .iter()
        .chain(regular)
        .map(|n| n.base.id.clone())
        .collect();
    let mut seen_raw: HashSet<String> = HashSet::with_capacity(sponsored.len());
    let mut dropped = Vec::new();
    let mut kept = Vec::with_capacity(sponsored.len());

    for mut s in sponsored {
        let raw = s.base.id.clone();
        if !seen_raw.insert(raw.clone()) {
            dropped.push(raw);
            continue;
        }
        if taken.contains(&raw) {
            let mut candidate = format!("sponsored-{raw}");
            let mut k = 2;
            while taken.contains(&candidate) {
                candidate = format!("sponsored-{raw}-{k}");
                k += 1;
            }
            tracing::debug!(target: "feed", from = %raw, to = %candidate, "sponsored id namespaced");
            s.base.id = candidate;
        }
        taken.insert(s.base.id.clone());
        kept.push(s);
    }
    (kept, dropped)
}

pub fn build_meta(data: &[FeedItem], pinned: &[NewsItem]) -> FeedMeta {
    FeedMeta {
        total: data.len(),
        news_count: data.iter().filter(|i| i.is_news()).count(),
        sponsored_count: data.iter().filter(|i| i.is_sponsored()).count(),
        breaking_count: data.iter().filter(|i| i.is_breaking()).count(),
        pinned_count: pinned.len(),
        pinned_items: pinned
            .iter()
            .map(|p| PinnedSummary {
                id: p.base.id.clone(),
                title: p.base.title.clone(),
                category: p.base.category.clone().unwrap_or_default(),
            })
            .collect(),
    }
}

pub fn build_envelope(data: Vec<FeedItem>, pinned: Vec<NewsItem>) -> MixedFeed {
    let meta = build_meta(&data, &pinned);
    MixedFeed {
        data,
        pinned_news: pinned,
        meta,
    }
}
