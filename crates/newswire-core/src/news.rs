//! The normalized news record and the filter object used to read it back.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Language code emitted when detection is impossible or fails.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Coarse polarity label attached to every [`NewsItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            "unknown" => Ok(Sentiment::Unknown),
            other => Err(format!("unrecognized sentiment label: {other}")),
        }
    }
}

/// One normalized article, as produced by a source adapter.
///
/// `url` is the identity key. An empty `url` is allowed but never collides
/// with anything, neither in deduplication nor in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub pub_date: DateTime<Utc>,
    /// Publisher name from source configuration.
    pub source: String,
    /// Country/region tag from source configuration.
    pub country: String,
    pub summary: String,
    pub url: String,
    pub language: String,
    pub sentiment: Sentiment,
}

impl NewsItem {
    /// Whether this item carries a usable identity.
    #[must_use]
    pub fn has_identity(&self) -> bool {
        !self.url.is_empty()
    }
}

/// Optional conjunction of read filters.
///
/// Every `None` field is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsFilters {
    pub country: Option<String>,
    pub language: Option<String>,
    /// Inclusive lower bound on `pub_date`.
    pub start_date: Option<DateTime<Utc>>,
}

impl NewsFilters {
    #[must_use]
    pub fn matches(&self, item: &NewsItem) -> bool {
        self.country.as_deref().is_none_or(|c| item.country == c)
            && self.language.as_deref().is_none_or(|l| item.language == l)
            && self.start_date.is_none_or(|start| item.pub_date >= start)
    }
}

/// Parse a caller-supplied start date.
///
/// Accepts a bare `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
///
/// # Errors
///
/// Returns a description of the problem when the value matches neither form.
pub fn parse_start_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid start_date '{raw}': {e}"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn item(country: &str, language: &str, pub_date: DateTime<Utc>) -> NewsItem {
        NewsItem {
            title: "t".to_string(),
            pub_date,
            source: "BBC".to_string(),
            country: country.to_string(),
            summary: String::new(),
            url: "https://example.com/a".to_string(),
            language: language.to_string(),
            sentiment: Sentiment::Neutral,
        }
    }

    #[test]
    fn sentiment_round_trips_through_display_and_from_str() {
        for s in [
            Sentiment::Positive,
            Sentiment::Negative,
            Sentiment::Neutral,
            Sentiment::Unknown,
        ] {
            assert_eq!(s.to_string().parse::<Sentiment>(), Ok(s));
        }
        assert!("meh".parse::<Sentiment>().is_err());
    }

    #[test]
    fn sentiment_serializes_lowercase() {
        let json = serde_json::to_string(&Sentiment::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
    }

    #[test]
    fn empty_filters_match_everything() {
        let it = item("UK", "en", Utc::now());
        assert!(NewsFilters::default().matches(&it));
    }

    #[test]
    fn filters_are_a_conjunction() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let it = item("UK", "en", date);

        let filters = NewsFilters {
            country: Some("UK".to_string()),
            language: Some("en".to_string()),
            start_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        };
        assert!(filters.matches(&it));

        let wrong_language = NewsFilters {
            language: Some("fr".to_string()),
            ..filters.clone()
        };
        assert!(!wrong_language.matches(&it));

        let too_late = NewsFilters {
            start_date: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            ..filters
        };
        assert!(!too_late.matches(&it));
    }

    #[test]
    fn start_date_bound_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let filters = NewsFilters {
            start_date: Some(start),
            ..NewsFilters::default()
        };
        assert!(filters.matches(&item("UK", "en", start)));
    }

    #[test]
    fn parse_start_date_accepts_bare_date() {
        let parsed = parse_start_date("2024-01-01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn parse_start_date_accepts_rfc3339() {
        let parsed = parse_start_date("2024-01-01T06:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap());
    }

    #[test]
    fn parse_start_date_rejects_garbage() {
        assert!(parse_start_date("yesterday").is_err());
    }
}
