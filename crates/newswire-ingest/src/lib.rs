//! News ingestion for newswire.
//!
//! Fetches every configured source through its feed, search-API and archive
//! adapters, normalizes and classifies each record, collapses duplicates by
//! URL, and persists the batch through a [`newswire_db::NewsStore`].

pub mod aggregator;
pub mod dedupe;
pub mod error;
pub mod language;
pub mod normalize;
pub mod pipeline;
pub mod scorer;
pub mod sources;

pub use aggregator::Aggregator;
pub use dedupe::dedupe_by_url;
pub use error::IngestError;
pub use language::detect_language;
pub use normalize::clean_text;
pub use pipeline::{persist_batch, run_ingest, write_json_snapshot, IngestReport, IngestRun};
pub use scorer::analyze_sentiment;
pub use sources::{FetchOptions, Fetcher, SearchApiConfig};
