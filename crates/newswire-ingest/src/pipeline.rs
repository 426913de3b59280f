//! One ingestion pass: aggregate, dedupe, persist.

use std::path::Path;

use newswire_core::{NewsItem, SourceConfig};
use newswire_db::{InsertOutcome, NewsStore};
use serde::Serialize;

use crate::aggregator::Aggregator;
use crate::dedupe::dedupe_by_url;
use crate::error::IngestError;

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub sources: usize,
    /// Items returned by all adapters before deduplication.
    pub fetched: usize,
    pub unique: usize,
    pub inserted: usize,
    /// Items whose URL was already stored.
    pub skipped: usize,
    /// Items the store rejected with an error.
    pub failed: usize,
}

/// Outcome of [`run_ingest`]: the counters plus the deduplicated batch.
#[derive(Debug, Clone)]
pub struct IngestRun {
    pub report: IngestReport,
    pub items: Vec<NewsItem>,
}

/// Run one full pass over `sources` and persist the unique items.
///
/// Never fails as a whole: adapter errors degrade to empty results and a store
/// error on one item is logged and counted in [`IngestReport::failed`].
/// Re-running a pass is safe because inserts are idempotent by URL.
pub async fn run_ingest(
    aggregator: &Aggregator,
    sources: &[SourceConfig],
    store: &dyn NewsStore,
) -> IngestRun {
    let batch = aggregator.run_pass(sources).await;
    let fetched = batch.len();
    let items = dedupe_by_url(batch);

    let mut report = persist_batch(store, &items).await;
    report.sources = sources.len();
    report.fetched = fetched;
    report.unique = items.len();

    tracing::info!(
        sources = report.sources,
        fetched = report.fetched,
        unique = report.unique,
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failed,
        "ingest pass complete"
    );

    IngestRun { report, items }
}

/// Insert every item through the store, tallying outcomes.
pub async fn persist_batch(store: &dyn NewsStore, items: &[NewsItem]) -> IngestReport {
    let mut report = IngestReport::default();
    for item in items {
        match store.insert_if_absent(item).await {
            Ok(InsertOutcome::Inserted) => report.inserted += 1,
            Ok(InsertOutcome::Skipped) => report.skipped += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(
                    url = %item.url,
                    country = %item.country,
                    error = %e,
                    "failed to persist news item"
                );
            }
        }
    }
    report
}

/// Write `items` to `path` as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`IngestError::Snapshot`] if serialization or the write fails.
pub async fn write_json_snapshot(path: &Path, items: &[NewsItem]) -> Result<(), IngestError> {
    let snapshot_error = |source: std::io::Error| IngestError::Snapshot {
        path: path.display().to_string(),
        source,
    };
    let json = serde_json::to_vec_pretty(items).map_err(|e| snapshot_error(e.into()))?;
    tokio::fs::write(path, json).await.map_err(snapshot_error)?;
    tracing::info!(path = %path.display(), count = items.len(), "wrote JSON snapshot");
    Ok(())
}
