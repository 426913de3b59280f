//! Source adapters and the single dispatch point over them.

mod archive;
mod feed;
mod search_api;

pub use archive::parse_archive_page;
pub use feed::parse_feed;
pub use search_api::parse_search_response;

use std::time::Duration;

use chrono::{DateTime, Utc};
use newswire_core::{AppConfig, NewsItem, SourceConfig, SourceEndpoint};

use crate::error::IngestError;
use crate::language::detect_language;
use crate::scorer::analyze_sentiment;

/// Connect timeout, independent of the overall request timeout.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Credentials and host for the article-search API.
#[derive(Clone)]
pub struct SearchApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for SearchApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .finish()
    }
}

/// HTTP settings shared by every adapter.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// `None` disables the search-API adapter.
    pub search_api: Option<SearchApiConfig>,
}

impl FetchOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.http_timeout_secs,
            user_agent: config.user_agent.clone(),
            search_api: config.newsapi_key.as_ref().map(|key| SearchApiConfig {
                base_url: config.newsapi_base_url.clone(),
                api_key: key.clone(),
            }),
        }
    }
}

/// Fetches one endpoint of one source and turns it into [`NewsItem`]s.
///
/// Holds a single `reqwest::Client` so every upstream request shares the
/// configured timeout and identification header.
pub struct Fetcher {
    client: reqwest::Client,
    search_api: Option<SearchApiConfig>,
}

impl Fetcher {
    /// Build a fetcher from HTTP options.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(options: &FetchOptions) -> Result<Self, IngestError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(
                CONNECT_TIMEOUT_SECS.min(options.timeout_secs),
            ))
            .user_agent(options.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            search_api: options.search_api.clone(),
        })
    }

    #[must_use]
    pub fn search_api_enabled(&self) -> bool {
        self.search_api.is_some()
    }

    /// Fetch one endpoint. Never fails: errors are logged and degrade to an
    /// empty sequence.
    pub async fn fetch(&self, source: &SourceConfig, endpoint: &SourceEndpoint) -> Vec<NewsItem> {
        match self.try_fetch(source, endpoint).await {
            Ok(items) => {
                tracing::debug!(
                    country = %source.country,
                    agency = %source.agency,
                    source = endpoint.kind(),
                    count = items.len(),
                    "fetched source endpoint"
                );
                items
            }
            Err(e) => {
                tracing::warn!(
                    country = %source.country,
                    agency = %source.agency,
                    source = endpoint.kind(),
                    error = %e,
                    "source endpoint failed; continuing with zero items"
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch(
        &self,
        source: &SourceConfig,
        endpoint: &SourceEndpoint,
    ) -> Result<Vec<NewsItem>, IngestError> {
        let now = Utc::now();
        match endpoint {
            SourceEndpoint::Feed { url } => feed::fetch_feed(&self.client, source, url, now).await,
            SourceEndpoint::SearchApi { query } => match &self.search_api {
                Some(api) => {
                    search_api::fetch_search_api(&self.client, api, source, query, now).await
                }
                None => {
                    tracing::debug!(
                        agency = %source.agency,
                        "search API key not configured; skipping"
                    );
                    Ok(Vec::new())
                }
            },
            SourceEndpoint::Archive { url, selector } => {
                archive::fetch_archive(&self.client, source, url, selector, now).await
            }
        }
    }
}

/// GET `url`, treating any non-2xx status as an error.
async fn get_ok(client: &reqwest::Client, url: &str) -> Result<reqwest::Response, IngestError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(IngestError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

/// GET `url` and return the body decoded per its `Content-Type` charset.
async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, IngestError> {
    Ok(get_ok(client, url).await?.text().await?)
}

/// Attach configuration fields and classification to already-cleaned text.
pub(crate) fn build_item(
    source: &SourceConfig,
    title: String,
    summary: String,
    url: String,
    pub_date: DateTime<Utc>,
) -> NewsItem {
    let text = format!("{title} {summary}");
    NewsItem {
        language: detect_language(&text),
        sentiment: analyze_sentiment(&text),
        title,
        pub_date,
        source: source.agency.clone(),
        country: source.country.clone(),
        summary,
        url,
    }
}

#[cfg(test)]
pub(crate) fn test_source(country: &str, agency: &str) -> SourceConfig {
    SourceConfig {
        country: country.to_string(),
        agency: agency.to_string(),
        feed_url: "https://example.com/rss.xml".to_string(),
        archive_url: None,
        archive_selector: None,
    }
}
