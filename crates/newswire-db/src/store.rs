//! Storage seam shared by the ingest pipeline and the query server.

use async_trait::async_trait;
use newswire_core::{NewsFilters, NewsItem};

use crate::news::NewsRow;
use crate::DbError;

/// Result of an idempotent insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with the same non-empty `url` already exists.
    Skipped,
}

/// Durable news storage with idempotent inserts and filtered scans.
///
/// Implementations must never surface a uniqueness violation from
/// [`NewsStore::insert_if_absent`]; a conflicting `url` is reported as
/// [`InsertOutcome::Skipped`]. Empty URLs never conflict.
#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Store `item` unless a row with the same non-empty `url` exists.
    async fn insert_if_absent(&self, item: &NewsItem) -> Result<InsertOutcome, DbError>;

    /// Return every row matching all set filters, in storage order.
    async fn find(&self, filters: &NewsFilters) -> Result<Vec<NewsRow>, DbError>;

    /// Cheap liveness probe.
    async fn health_check(&self) -> Result<(), DbError>;
}
