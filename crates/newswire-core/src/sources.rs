use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ConfigError;

/// Generic archive link rule: every anchor on the page.
pub const GENERIC_ARCHIVE_SELECTOR: &str = "a";

/// Publisher-specific archive link rules, matched against the archive host.
const ARCHIVE_SELECTOR_RULES: &[(&str, &str)] = &[("bbc.", "a.gs-c-promo-heading")];

/// One configured publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub country: String,
    pub agency: String,
    pub feed_url: String,
    #[serde(default)]
    pub archive_url: Option<String>,
    /// CSS selector overriding the built-in archive link rule.
    #[serde(default)]
    pub archive_selector: Option<String>,
}

/// The closed set of ways a source can be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEndpoint {
    Feed { url: String },
    SearchApi { query: String },
    Archive { url: String, selector: String },
}

impl SourceEndpoint {
    /// Short label used in logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            SourceEndpoint::Feed { .. } => "feed",
            SourceEndpoint::SearchApi { .. } => "search_api",
            SourceEndpoint::Archive { .. } => "archive",
        }
    }
}

impl SourceConfig {
    /// Endpoints for this source in pass order: feed, search API, then the
    /// archive page when one is configured.
    #[must_use]
    pub fn endpoints(&self) -> Vec<SourceEndpoint> {
        let mut endpoints = vec![
            SourceEndpoint::Feed {
                url: self.feed_url.clone(),
            },
            SourceEndpoint::SearchApi {
                query: self.agency.clone(),
            },
        ];
        if let Some(archive_url) = &self.archive_url {
            endpoints.push(SourceEndpoint::Archive {
                url: archive_url.clone(),
                selector: self.archive_link_selector(),
            });
        }
        endpoints
    }

    /// CSS selector used to pick article links from the archive page.
    #[must_use]
    pub fn archive_link_selector(&self) -> String {
        if let Some(selector) = &self.archive_selector {
            return selector.clone();
        }
        let host = self
            .archive_url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
            .and_then(|url| url.host_str().map(str::to_lowercase))
            .unwrap_or_default();
        ARCHIVE_SELECTOR_RULES
            .iter()
            .find(|(needle, _)| host.contains(needle))
            .map_or(GENERIC_ARCHIVE_SELECTOR, |(_, selector)| *selector)
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

/// Load and validate the source list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_sources(&content)
}

/// Parse and validate a YAML source list.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_sources(yaml: &str) -> Result<SourcesFile, ConfigError> {
    let sources_file: SourcesFile = serde_yaml::from_str(yaml)?;
    validate_sources(&sources_file)?;
    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_countries = HashSet::new();

    for source in &sources_file.sources {
        if source.country.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source country must be non-empty".to_string(),
            ));
        }
        if source.agency.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "source '{}' has an empty agency name",
                source.country
            )));
        }

        validate_http_url(&source.country, "feed_url", &source.feed_url)?;
        if let Some(archive_url) = &source.archive_url {
            validate_http_url(&source.country, "archive_url", archive_url)?;
        }

        if !seen_countries.insert(source.country.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source country: '{}'",
                source.country
            )));
        }
    }

    Ok(())
}

fn validate_http_url(country: &str, field: &str, raw: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(raw).map_err(|e| {
        ConfigError::Validation(format!("source '{country}' has invalid {field} '{raw}': {e}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "source '{country}' {field} must be http(s), got '{raw}'"
        )));
    }
    Ok(())
}
