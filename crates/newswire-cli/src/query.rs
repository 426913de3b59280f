//! `sources` and `query` commands.

use newswire_core::{parse_start_date, AppConfig, NewsFilters, SourceEndpoint};
use newswire_db::{NewsStore, PgNewsStore};

pub(crate) fn print_sources(config: &AppConfig) -> anyhow::Result<()> {
    let sources_file = newswire_core::load_sources(&config.sources_path)?;
    for source in &sources_file.sources {
        println!("{} ({})", source.agency, source.country);
        for endpoint in source.endpoints() {
            match endpoint {
                SourceEndpoint::Feed { url } => println!("  feed        {url}"),
                SourceEndpoint::SearchApi { query } => {
                    println!("  search_api  q={query}");
                }
                SourceEndpoint::Archive { url, selector } => {
                    println!("  archive     {url} [{selector}]");
                }
            }
        }
    }
    Ok(())
}

/// Build filters from command-line flags; blank values are ignored.
///
/// # Errors
///
/// Returns an error if `start_date` is neither `YYYY-MM-DD` nor RFC 3339.
pub(crate) fn build_filters(
    country: Option<String>,
    language: Option<String>,
    start_date: Option<&str>,
) -> anyhow::Result<NewsFilters> {
    let start_date = start_date
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_start_date)
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(NewsFilters {
        country: country.filter(|c| !c.trim().is_empty()),
        language: language.filter(|l| !l.trim().is_empty()),
        start_date,
    })
}

pub(crate) async fn run_query(pool: &sqlx::PgPool, filters: &NewsFilters) -> anyhow::Result<()> {
    let store = PgNewsStore::new(pool.clone());
    let rows = store.find(filters).await?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
