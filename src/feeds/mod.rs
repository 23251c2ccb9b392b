//! Market data source adapters for Algorand DEX price APIs

pub mod tinyman;
pub mod pact;
pub mod vestige;
pub mod fallback;
pub mod poller;

pub use tinyman::*;
pub use pact::*;
pub use vestige::*;
pub use fallback::*;
pub use poller::*;

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use crate::errors::EngineResult;
use crate::types::PriceRecord;

/// One adapter per external price API. Adapters normalize responses into
/// `PriceRecord`s and fail with `SourceUnavailable` on any network or
/// parse problem; retries belong to the fallback manager, not here.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    fn name(&self) -> &str;

    /// Protocol swap fee, hardcoded per venue.
    fn fee_pct(&self) -> Decimal;

    async fn fetch(&self, pairs: &[String]) -> EngineResult<Vec<PriceRecord>>;
}

/// The standard set of mainnet adapters.
pub fn default_feeds() -> anyhow::Result<Vec<Arc<dyn PriceFeed>>> {
    Ok(vec![
        Arc::new(TinymanFeed::new()?),
        Arc::new(PactFeed::new()?),
        Arc::new(VestigeFeed::new()?),
    ])
}
