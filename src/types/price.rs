//! Price record types shared by feeds, validation, and the cache

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Cache key: one entry per (source, pair) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PriceKey {
    pub source: String,
    pub pair: String,
}

impl PriceKey {
    pub fn new(source: &str, pair: &str) -> Self {
        Self {
            source: source.to_string(),
            pair: pair.to_string(),
        }
    }
}

/// A single normalized price observation. Immutable once created.
#[derive(Debug, Clone, Serialize)]
pub struct PriceRecord {
    pub pair: String,
    pub source: String,
    pub price: Decimal,
    pub volume_24h: Decimal,
    pub fee_pct: Decimal,
    pub observed_at: DateTime<Utc>,
}

impl PriceRecord {
    pub fn key(&self) -> PriceKey {
        PriceKey::new(&self.source, &self.pair)
    }

    /// Age of the observation in whole seconds (0 for future timestamps).
    pub fn age_seconds(&self, now: DateTime<Utc>) -> u64 {
        (now - self.observed_at).num_seconds().max(0) as u64
    }
}
