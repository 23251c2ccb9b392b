//! Background polling workers, one per source
//!
//! Each worker owns its own schedule and feeds the shared cache through
//! the fallback manager and per-record validation. A misbehaving source
//! never affects the other workers.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use crate::{
    cache::PriceCache,
    validation::validate_record,
};
use super::{FallbackManager, PriceFeed};

pub fn spawn_pollers(
    feeds: Vec<Arc<dyn PriceFeed>>,
    fallback: Arc<FallbackManager>,
    cache: Arc<PriceCache>,
    pairs: Vec<String>,
    interval_secs: u64,
) -> Vec<JoinHandle<()>> {
    feeds
        .into_iter()
        .map(|feed| {
            let fallback = Arc::clone(&fallback);
            let cache = Arc::clone(&cache);
            let pairs = pairs.clone();

            tokio::spawn(async move {
                info!("📡 Polling {} every {}s", feed.name(), interval_secs);
                let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
                loop {
                    interval.tick().await;
                    poll_source_once(feed.as_ref(), &fallback, &cache, &pairs).await;
                }
            })
        })
        .collect()
}

/// One fetch-validate-store pass for a single source.
pub async fn poll_source_once(
    feed: &dyn PriceFeed,
    fallback: &FallbackManager,
    cache: &PriceCache,
    pairs: &[String],
) {
    let records = fallback.call(feed, pairs).await;

    for record in records {
        let previous = cache.get(&record.key()).await;
        match validate_record(&record, previous.as_ref()) {
            Ok(()) => cache.put(record).await,
            Err(e) => debug!("Dropping record from {}: {}", feed.name(), e),
        }
    }
}
