//! Article-search API adapter (NewsAPI `/v2/everything` wire format).

use chrono::{DateTime, Duration, Utc};
use newswire_core::{NewsItem, SourceConfig};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

use super::{build_item, SearchApiConfig};
use crate::error::IngestError;
use crate::normalize::{clean_opt, clean_text};

/// Days of history requested per query.
pub const SEARCH_WINDOW_DAYS: i64 = 30;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<SearchArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

/// Build the request URL for one publisher query.
pub(crate) fn search_url(base_url: &str, query: &str, now: DateTime<Utc>) -> String {
    let from = (now - Duration::days(SEARCH_WINDOW_DAYS)).format("%Y-%m-%d");
    let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC);
    format!(
        "{}/v2/everything?q={encoded}&from={from}",
        base_url.trim_end_matches('/')
    )
}

pub(super) async fn fetch_search_api(
    client: &reqwest::Client,
    api: &SearchApiConfig,
    source: &SourceConfig,
    query: &str,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>, IngestError> {
    let url = search_url(&api.base_url, query, now);
    let response = client
        .get(&url)
        .header(API_KEY_HEADER, api.api_key.as_str())
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        // Error bodies carry a message worth surfacing; fall back to the status.
        return Err(match serde_json::from_str::<SearchResponse>(&body) {
            Ok(SearchResponse {
                message: Some(message),
                ..
            }) => IngestError::SearchApi(format!("HTTP {}: {message}", status.as_u16())),
            _ => IngestError::UnexpectedStatus {
                status: status.as_u16(),
                url: format!("{}/v2/everything", api.base_url.trim_end_matches('/')),
            },
        });
    }

    parse_search_response(&body, source, now)
}

/// Map a search response body onto items.
///
/// Articles whose title, description and url are all empty are skipped. A
/// missing or unparseable `publishedAt` falls back to `now`.
///
/// # Errors
///
/// Returns [`IngestError::Deserialize`] for a body that is not the expected
/// JSON shape, or [`IngestError::SearchApi`] when the body reports
/// `status != "ok"`.
pub fn parse_search_response(
    body: &str,
    source: &SourceConfig,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>, IngestError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| IngestError::Deserialize {
            context: "search API response".to_string(),
            source: e,
        })?;

    if response.status != "ok" {
        return Err(IngestError::SearchApi(
            response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        ));
    }

    let items = response
        .articles
        .into_iter()
        .filter_map(|article| {
            let title = clean_opt(article.title.as_deref());
            let summary = clean_opt(article.description.as_deref());
            let url = article.url.as_deref().map(str::trim).unwrap_or_default();
            if title.is_empty() && summary.is_empty() && url.is_empty() {
                return None;
            }
            let pub_date = article
                .published_at
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(clean_text(raw).as_str()).ok())
                .map_or(now, |dt| dt.with_timezone(&Utc));
            Some(build_item(source, title, summary, url.to_string(), pub_date))
        })
        .collect();

    Ok(items)
}
