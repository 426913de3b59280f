//! In-process [`NewsStore`] with the same uniqueness and filter semantics as
//! the Postgres store. Used for dry runs and tests.

use std::collections::HashSet;

use async_trait::async_trait;
use newswire_core::{NewsFilters, NewsItem};
use tokio::sync::Mutex;

use crate::news::NewsRow;
use crate::store::{InsertOutcome, NewsStore};
use crate::DbError;

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<NewsRow>,
    urls: HashSet<String>,
    next_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryNewsStore {
    state: Mutex<MemoryState>,
}

impl MemoryNewsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of every stored row in insertion order.
    pub async fn rows(&self) -> Vec<NewsRow> {
        self.state.lock().await.rows.clone()
    }
}

#[async_trait]
impl NewsStore for MemoryNewsStore {
    async fn insert_if_absent(&self, item: &NewsItem) -> Result<InsertOutcome, DbError> {
        let mut state = self.state.lock().await;

        if item.has_identity() && !state.urls.insert(item.url.clone()) {
            return Ok(InsertOutcome::Skipped);
        }

        state.next_id += 1;
        let id = state.next_id;
        state.rows.push(NewsRow {
            id,
            item: item.clone(),
        });
        Ok(InsertOutcome::Inserted)
    }

    async fn find(&self, filters: &NewsFilters) -> Result<Vec<NewsRow>, DbError> {
        let state = self.state.lock().await;
        Ok(state
            .rows
            .iter()
            .filter(|row| filters.matches(&row.item))
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }
}
