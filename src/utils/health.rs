//! Health monitoring utilities

use std::sync::Arc;
use std::time::Instant;
use crate::{
    cache::PriceCache,
    feeds::FallbackManager,
    types::HealthStatus,
};

pub async fn run_health_check(
    fallback: &Arc<FallbackManager>,
    cache: &Arc<PriceCache>,
    start_time: Instant,
) -> HealthStatus {
    let sources = fallback.health_snapshot().await;
    let healthy_sources = sources.values().filter(|h| h.active).count();

    HealthStatus {
        sources,
        healthy_sources,
        cached_entries: cache.len().await,
        uptime_seconds: start_time.elapsed().as_secs(),
    }
}
