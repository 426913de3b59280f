use std::collections::HashSet;

use newswire_core::NewsItem;

/// Collapse `batch` to one item per non-empty URL, keeping the first
/// occurrence and preserving order.
///
/// Items with an empty URL have no identity and are always kept.
#[must_use]
pub fn dedupe_by_url(mut batch: Vec<NewsItem>) -> Vec<NewsItem> {
    let mut seen: HashSet<String> = HashSet::with_capacity(batch.len());
    batch.retain(|item| !item.has_identity() || seen.insert(item.url.clone()));
    batch
}
