//! Live tests for `PgNewsStore` using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database from the sqlx
//! test harness. They need a reachable `DATABASE_URL`, so they are ignored by
//! default: run with `cargo test -p newswire-db -- --ignored`.

use chrono::{TimeZone, Utc};
use newswire_core::{NewsFilters, NewsItem, Sentiment};
use newswire_db::{InsertOutcome, NewsStore, PgNewsStore};

fn make_item(url: &str, country: &str, language: &str, day: u32) -> NewsItem {
    NewsItem {
        title: format!("Story {url}"),
        pub_date: Utc.with_ymd_and_hms(2024, 1, day, 9, 30, 0).unwrap(),
        source: "Agency".to_string(),
        country: country.to_string(),
        summary: "Summary".to_string(),
        url: url.to_string(),
        language: language.to_string(),
        sentiment: Sentiment::Positive,
    }
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn insert_if_absent_skips_existing_url(pool: sqlx::PgPool) {
    let store = PgNewsStore::new(pool);
    let item = make_item("https://example.com/a", "UK", "en", 2);

    let first = store.insert_if_absent(&item).await.expect("first insert");
    let second = store.insert_if_absent(&item).await.expect("second insert");

    assert_eq!(first, InsertOutcome::Inserted);
    assert_eq!(second, InsertOutcome::Skipped);

    let rows = store.find(&NewsFilters::default()).await.expect("find");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item, item);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn empty_urls_never_conflict(pool: sqlx::PgPool) {
    let store = PgNewsStore::new(pool);
    let item = make_item("", "UK", "en", 2);

    for _ in 0..2 {
        let outcome = store.insert_if_absent(&item).await.expect("insert");
        assert_eq!(outcome, InsertOutcome::Inserted);
    }
    let rows = store.find(&NewsFilters::default()).await.expect("find");
    assert_eq!(rows.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn find_applies_every_filter(pool: sqlx::PgPool) {
    let store = PgNewsStore::new(pool);
    store
        .insert_if_absent(&make_item("https://example.com/uk-old", "UK", "en", 1))
        .await
        .expect("insert");
    store
        .insert_if_absent(&make_item("https://example.com/uk-new", "UK", "en", 20))
        .await
        .expect("insert");
    store
        .insert_if_absent(&make_item("https://example.com/fr", "France", "fr", 20))
        .await
        .expect("insert");

    let by_country = store
        .find(&NewsFilters {
            country: Some("UK".to_string()),
            ..NewsFilters::default()
        })
        .await
        .expect("find");
    assert_eq!(by_country.len(), 2);
    assert!(by_country.iter().all(|r| r.item.country == "UK"));

    let by_language = store
        .find(&NewsFilters {
            language: Some("fr".to_string()),
            ..NewsFilters::default()
        })
        .await
        .expect("find");
    assert_eq!(by_language.len(), 1);

    let since = store
        .find(&NewsFilters {
            country: Some("UK".to_string()),
            start_date: Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()),
            ..NewsFilters::default()
        })
        .await
        .expect("find");
    assert_eq!(since.len(), 1);
    assert_eq!(since[0].item.url, "https://example.com/uk-new");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres DATABASE_URL"]
async fn health_check_succeeds_on_live_pool(pool: sqlx::PgPool) {
    let store = PgNewsStore::new(pool);
    store.health_check().await.expect("health check");
}
