//! Shared domain types and configuration for newswire.

pub mod app_config;
pub mod config;
pub mod news;
pub mod sources;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_USER_AGENT};
pub use news::{parse_start_date, NewsFilters, NewsItem, Sentiment, UNKNOWN_LANGUAGE};
pub use sources::{load_sources, parse_sources, SourceConfig, SourceEndpoint, SourcesFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("invalid source configuration: {0}")]
    Validation(String),
}
