//! Postgres-backed [`NewsStore`] over the `news_items` table.

use async_trait::async_trait;
use newswire_core::{NewsFilters, NewsItem, Sentiment};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::store::{InsertOutcome, NewsStore};
use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A stored news item with its synthetic identifier.
///
/// Serializes flat: `{id, title, pub_date, source, country, summary, url,
/// language, sentiment}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsRow {
    pub id: i64,
    #[serde(flatten)]
    pub item: NewsItem,
}

impl<'r> sqlx::FromRow<'r, PgRow> for NewsRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let raw_sentiment: String = row.try_get("sentiment")?;
        let sentiment =
            raw_sentiment
                .parse::<Sentiment>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "sentiment".to_string(),
                    source: e.into(),
                })?;

        Ok(Self {
            id: row.try_get("id")?,
            item: NewsItem {
                title: row.try_get("title")?,
                pub_date: row.try_get("pub_date")?,
                source: row.try_get("source")?,
                country: row.try_get("country")?,
                summary: row.try_get("summary")?,
                url: row.try_get("url")?,
                language: row.try_get("language")?,
                sentiment,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Owns the connection pool for the lifetime of one run.
#[derive(Debug, Clone)]
pub struct PgNewsStore {
    pool: PgPool,
}

impl PgNewsStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Release all pooled connections.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl NewsStore for PgNewsStore {
    /// Insert unless the `url` already exists.
    ///
    /// The `WHERE url <> ''` conflict target matches the partial unique
    /// index, so empty URLs always insert.
    async fn insert_if_absent(&self, item: &NewsItem) -> Result<InsertOutcome, DbError> {
        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO news_items \
                 (title, pub_date, source, country, summary, url, language, sentiment) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (url) WHERE url <> '' DO NOTHING \
             RETURNING id",
        )
        .bind(&item.title)
        .bind(item.pub_date)
        .bind(&item.source)
        .bind(&item.country)
        .bind(&item.summary)
        .bind(&item.url)
        .bind(&item.language)
        .bind(item.sentiment.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(match id {
            Some(_) => InsertOutcome::Inserted,
            None => InsertOutcome::Skipped,
        })
    }

    async fn find(&self, filters: &NewsFilters) -> Result<Vec<NewsRow>, DbError> {
        let rows = sqlx::query_as::<_, NewsRow>(
            "SELECT id, title, pub_date, source, country, summary, url, language, sentiment \
             FROM news_items \
             WHERE ($1::TEXT IS NULL OR country = $1) \
               AND ($2::TEXT IS NULL OR language = $2) \
               AND ($3::timestamptz IS NULL OR pub_date >= $3) \
             ORDER BY id",
        )
        .bind(filters.country.as_deref())
        .bind(filters.language.as_deref())
        .bind(filters.start_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn health_check(&self) -> Result<(), DbError> {
        crate::ping(&self.pool).await?;
        Ok(())
    }
}
