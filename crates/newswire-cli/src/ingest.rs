//! `ingest` command: one aggregation pass persisted to Postgres or memory.

use std::path::Path;
use std::time::Duration;

use newswire_core::{AppConfig, SourceConfig};
use newswire_db::{MemoryNewsStore, PgNewsStore};
use newswire_ingest::{run_ingest, write_json_snapshot, Aggregator, FetchOptions, Fetcher};

/// Narrow the source list to one country (case-insensitive) when requested.
///
/// # Errors
///
/// Returns an error if `country` matches no configured source.
pub(crate) fn select_sources(
    sources: Vec<SourceConfig>,
    country: Option<&str>,
) -> anyhow::Result<Vec<SourceConfig>> {
    let Some(wanted) = country else {
        return Ok(sources);
    };
    let selected: Vec<SourceConfig> = sources
        .into_iter()
        .filter(|s| s.country.eq_ignore_ascii_case(wanted.trim()))
        .collect();
    if selected.is_empty() {
        anyhow::bail!("no configured source for country '{wanted}'");
    }
    Ok(selected)
}

pub(crate) async fn run_ingest_command(
    config: &AppConfig,
    dry_run: bool,
    country: Option<&str>,
    json_out: Option<&Path>,
) -> anyhow::Result<()> {
    let sources_file = newswire_core::load_sources(&config.sources_path)?;
    let sources = select_sources(sources_file.sources, country)?;

    let fetcher = Fetcher::new(&FetchOptions::from_app_config(config))
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;
    let aggregator = Aggregator::new(fetcher, Duration::from_millis(config.source_delay_ms));

    tracing::info!(sources = sources.len(), dry_run, "starting ingest pass");

    let run = if dry_run {
        let store = MemoryNewsStore::new();
        run_ingest(&aggregator, &sources, &store).await
    } else {
        let pool = crate::connect(config).await?;
        newswire_db::run_migrations(&pool).await?;
        let store = PgNewsStore::new(pool);
        let run = run_ingest(&aggregator, &sources, &store).await;
        store.close().await;
        run
    };

    if let Some(path) = json_out {
        write_json_snapshot(path, &run.items).await?;
    }

    if dry_run {
        println!("dry-run: nothing written to the database");
    }
    println!("{}", serde_json::to_string_pretty(&run.report)?);
    Ok(())
}
