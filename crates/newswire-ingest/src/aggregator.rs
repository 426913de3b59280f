//! Sequential pass over every configured source.

use std::time::Duration;

use newswire_core::{NewsItem, SourceConfig, SourceEndpoint};

use crate::sources::Fetcher;

/// Drives all configured sources in order and concatenates their items.
pub struct Aggregator {
    fetcher: Fetcher,
    source_delay: Duration,
}

impl Aggregator {
    #[must_use]
    pub fn new(fetcher: Fetcher, source_delay: Duration) -> Self {
        Self {
            fetcher,
            source_delay,
        }
    }

    /// Run one pass over `sources`.
    ///
    /// For each source, in list order, the feed, search-API and (when
    /// configured) archive endpoints are fetched and appended. A failing
    /// endpoint contributes zero items and never stops the pass. The courtesy
    /// pause runs between sources, not after the last one.
    ///
    /// The result is in source-then-endpoint order and may contain duplicates.
    pub async fn run_pass(&self, sources: &[SourceConfig]) -> Vec<NewsItem> {
        if !self.fetcher.search_api_enabled() {
            tracing::info!("NEWSAPI_KEY not set; search API adapter disabled for this pass");
        }

        let mut batch = Vec::new();
        for (index, source) in sources.iter().enumerate() {
            if index > 0 && !self.source_delay.is_zero() {
                tokio::time::sleep(self.source_delay).await;
            }

            let mut counts = [0_usize; 3];
            for endpoint in source.endpoints() {
                let items = self.fetcher.fetch(source, &endpoint).await;
                counts[endpoint_slot(&endpoint)] += items.len();
                batch.extend(items);
            }

            tracing::info!(
                country = %source.country,
                agency = %source.agency,
                feed = counts[0],
                search_api = counts[1],
                archive = counts[2],
                "source processed"
            );
        }
        batch
    }
}

fn endpoint_slot(endpoint: &SourceEndpoint) -> usize {
    match endpoint {
        SourceEndpoint::Feed { .. } => 0,
        SourceEndpoint::SearchApi { .. } => 1,
        SourceEndpoint::Archive { .. } => 2,
    }
}
