//! HTML archive page adapter.
//!
//! Archive pages carry no machine-readable dates or excerpts, so each link
//! becomes an item whose summary is its title and whose publication time is a
//! fixed offset before ingestion.

use chrono::{DateTime, Duration, Utc};
use newswire_core::{NewsItem, SourceConfig};
use reqwest::Url;
use scraper::{Html, Selector};

use super::{build_item, get_text};
use crate::error::IngestError;
use crate::normalize::clean_text;

/// Upper bound on links taken from one archive page.
pub const MAX_ARCHIVE_LINKS: usize = 10;

/// Placeholder age assigned to archive items.
pub const ARCHIVE_AGE_DAYS: i64 = 365;

pub(super) async fn fetch_archive(
    client: &reqwest::Client,
    source: &SourceConfig,
    url: &str,
    selector: &str,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>, IngestError> {
    let body = get_text(client, url).await?;
    parse_archive_page(&body, url, selector, source, now)
}

/// Extract up to [`MAX_ARCHIVE_LINKS`] article links from an archive page.
///
/// Relative hrefs are resolved against `page_url` and fragments are removed.
/// Anchors with no href, a bare fragment, or a `mailto:`/`javascript:` target
/// are skipped before the cap is applied.
///
/// # Errors
///
/// Returns [`IngestError::InvalidUrl`] if `page_url` is not an absolute URL, or
/// [`IngestError::InvalidSelector`] if `selector` is not valid CSS.
pub fn parse_archive_page(
    html: &str,
    page_url: &str,
    selector: &str,
    source: &SourceConfig,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>, IngestError> {
    let base = Url::parse(page_url).map_err(|e| IngestError::InvalidUrl {
        url: page_url.to_string(),
        reason: e.to_string(),
    })?;
    let link_selector = Selector::parse(selector).map_err(|e| IngestError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;

    let pub_date = now - Duration::days(ARCHIVE_AGE_DAYS);
    let document = Html::parse_document(html);

    let items = document
        .select(&link_selector)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if !is_article_href(href) {
                return None;
            }
            let mut resolved = base.join(href).ok()?;
            resolved.set_fragment(None);
            let title = clean_text(&element.text().collect::<Vec<_>>().join(" "));
            Some((title, resolved.to_string()))
        })
        .take(MAX_ARCHIVE_LINKS)
        .map(|(title, url)| build_item(source, title.clone(), title, url, pub_date))
        .collect();

    Ok(items)
}

fn is_article_href(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    !(href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("mailto:")
        || lower.starts_with("javascript:"))
}
