//! Bounded, time-aware store of the latest validated price per
//! (source, pair) key

use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use crate::{
    config::{CACHE_CLEANUP_THRESHOLD, CACHE_MAX_SIZE, CACHE_PURGE_AGE_SECONDS},
    types::{PriceKey, PriceRecord},
};

pub struct PriceCache {
    entries: RwLock<HashMap<PriceKey, PriceRecord>>,
    max_size: usize,
    cleanup_threshold: f64,
    purge_age_seconds: u64,
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new(CACHE_MAX_SIZE, CACHE_CLEANUP_THRESHOLD, CACHE_PURGE_AGE_SECONDS)
    }
}

impl PriceCache {
    pub fn new(max_size: usize, cleanup_threshold: f64, purge_age_seconds: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_size,
            cleanup_threshold,
            purge_age_seconds,
        }
    }

    /// Store one record, overwriting any previous entry for its key. The
    /// writer is responsible for validating records before insertion.
    /// Triggers cleanup once occupancy crosses the configured fraction of
    /// capacity.
    pub async fn put(&self, record: PriceRecord) {
        let needs_cleanup = {
            let mut entries = self.entries.write().await;
            entries.insert(record.key(), record);
            entries.len() as f64 > self.max_size as f64 * self.cleanup_threshold
        };

        if needs_cleanup {
            self.cleanup().await;
        }
    }

    /// Latest record for one key, if present.
    pub async fn get(&self, key: &PriceKey) -> Option<PriceRecord> {
        self.entries.read().await.get(key).cloned()
    }

    /// Owned snapshot of every entry no older than `max_age_seconds`.
    /// Callers never get a handle into the live map.
    pub async fn get_fresh(&self, max_age_seconds: u64) -> HashMap<PriceKey, PriceRecord> {
        let now = Utc::now();
        self.entries
            .read()
            .await
            .iter()
            .filter(|(_, record)| record.age_seconds(now) <= max_age_seconds)
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// First purge entries past the hard age limit, then, if still over
    /// capacity, evict the oldest remaining entries until at capacity.
    pub async fn cleanup(&self) {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        let cutoff = Utc::now() - Duration::seconds(self.purge_age_seconds as i64);

        entries.retain(|_, record| record.observed_at >= cutoff);

        if entries.len() > self.max_size {
            let mut by_age: Vec<(PriceKey, chrono::DateTime<Utc>)> = entries
                .iter()
                .map(|(key, record)| (key.clone(), record.observed_at))
                .collect();
            by_age.sort_by_key(|(_, observed_at)| *observed_at);

            let excess = entries.len() - self.max_size;
            for (key, _) in by_age.into_iter().take(excess) {
                entries.remove(&key);
            }
        }

        if entries.len() < before {
            debug!("Cache cleanup: {} -> {} entries", before, entries.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(source: &str, pair: &str, price: Decimal, age_secs: i64) -> PriceRecord {
        PriceRecord {
            pair: pair.to_string(),
            source: source.to_string(),
            price,
            volume_24h: dec!(100000),
            fee_pct: dec!(0.3),
            observed_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[tokio::test]
    async fn put_overwrites_same_key() {
        let cache = PriceCache::default();
        cache.put(record("tinyman", "ALGO/USDC", dec!(0.18), 10)).await;
        cache.put(record("tinyman", "ALGO/USDC", dec!(0.19), 0)).await;

        assert_eq!(cache.len().await, 1);
        let key = PriceKey::new("tinyman", "ALGO/USDC");
        assert_eq!(cache.get(&key).await.unwrap().price, dec!(0.19));
    }

    #[tokio::test]
    async fn fresh_reads_never_return_stale_entries() {
        let cache = PriceCache::default();
        cache.put(record("tinyman", "ALGO/USDC", dec!(0.18), 0)).await;
        cache.put(record("pact", "ALGO/USDC", dec!(0.18), 400)).await;

        let snapshot = cache.get_fresh(300).await;
        assert_eq!(snapshot.len(), 1);
        let now = Utc::now();
        assert!(snapshot.values().all(|r| r.age_seconds(now) <= 300));
    }

    #[tokio::test]
    async fn eviction_keeps_most_recent_under_capacity() {
        let cache = PriceCache::new(1000, 0.8, 3600);
        // 1200 distinct keys, older entries first
        for i in 0..1200u32 {
            cache
                .put(record(
                    &format!("src{}", i),
                    "ALGO/USDC",
                    dec!(0.18),
                    (1200 - i) as i64,
                ))
                .await;
        }

        assert!(cache.len().await <= 1000);
        // The newest entry must have survived
        let key = PriceKey::new("src1199", "ALGO/USDC");
        assert!(cache.get(&key).await.is_some());
    }

    #[tokio::test]
    async fn cleanup_purges_hard_aged_entries_first() {
        let cache = PriceCache::new(10, 0.8, 3600);
        cache.put(record("old", "ALGO/USDC", dec!(0.18), 4000)).await;
        cache.put(record("new", "ALGO/USDC", dec!(0.18), 5)).await;

        cache.cleanup().await;

        assert!(cache.get(&PriceKey::new("old", "ALGO/USDC")).await.is_none());
        assert!(cache.get(&PriceKey::new("new", "ALGO/USDC")).await.is_some());
    }
}
