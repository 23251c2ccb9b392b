//! Vestige price feed adapter
//!
//! Vestige aggregates Algorand markets and answers all requested pairs in
//! a single call, unlike the per-pair Tinyman/Pact endpoints.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use crate::{
    errors::{EngineError, EngineResult},
    network::build_http_client,
    types::PriceRecord,
};

const VESTIGE_BASE_URL: &str = "https://free-api.vestige.fi";
const VESTIGE_FEE_PCT: Decimal = dec!(0.3);

pub struct VestigeFeed {
    client: reqwest::Client,
    base_url: String,
}

impl VestigeFeed {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            base_url: VESTIGE_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            base_url: base_url.to_string(),
        })
    }

    fn unavailable(&self, message: String, source: Option<anyhow::Error>) -> EngineError {
        EngineError::SourceUnavailable {
            source_name: "vestige".to_string(),
            message,
            source,
            retry_count: 0,
        }
    }
}

#[async_trait::async_trait]
impl super::PriceFeed for VestigeFeed {
    fn name(&self) -> &str {
        "vestige"
    }

    fn fee_pct(&self) -> Decimal {
        VESTIGE_FEE_PCT
    }

    async fn fetch(&self, pairs: &[String]) -> EngineResult<Vec<PriceRecord>> {
        let url = format!("{}/currency/prices?pairs={}", self.base_url, pairs.join(","));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unavailable("HTTP request failed".to_string(), Some(e.into())))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(self.unavailable(format!("API returned status {}", status), None));
        }

        let entries: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| self.unavailable("invalid JSON response".to_string(), Some(e.into())))?;

        let mut by_pair: HashMap<String, PriceRecord> = HashMap::new();
        for entry in &entries {
            let pair = entry["pair"]
                .as_str()
                .ok_or_else(|| self.unavailable("missing 'pair' field".to_string(), None))?;
            let price = entry["price"]
                .as_f64()
                .and_then(Decimal::from_f64)
                .ok_or_else(|| self.unavailable(format!("missing 'price' for {}", pair), None))?;
            let volume_24h = entry["volume"]
                .as_f64()
                .and_then(Decimal::from_f64)
                .ok_or_else(|| self.unavailable(format!("missing 'volume' for {}", pair), None))?;

            by_pair.insert(
                pair.to_string(),
                PriceRecord {
                    pair: pair.to_string(),
                    source: "vestige".to_string(),
                    price,
                    volume_24h,
                    fee_pct: VESTIGE_FEE_PCT,
                    observed_at: Utc::now(),
                },
            );
        }

        // Every requested pair must be present or the whole call fails;
        // partial responses would look like a healthy source going quiet.
        let mut records = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let record = by_pair
                .remove(pair)
                .ok_or_else(|| self.unavailable(format!("no data for {}", pair), None))?;
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::PriceFeed;

    #[tokio::test]
    async fn fetches_all_pairs_in_one_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/currency/prices")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"pair": "ALGO/USDC", "price": 0.1833, "volume": 95000.0},
                    {"pair": "ALGO/USDT", "price": 0.1836, "volume": 42000.0}
                ]"#,
            )
            .create_async()
            .await;

        let feed = VestigeFeed::with_base_url(&server.url()).unwrap();
        let records = feed
            .fetch(&["ALGO/USDC".to_string(), "ALGO/USDT".to_string()])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.source == "vestige"));
    }

    #[tokio::test]
    async fn missing_requested_pair_fails_whole_call() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/currency/prices")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"pair": "ALGO/USDC", "price": 0.1833, "volume": 95000.0}]"#)
            .create_async()
            .await;

        let feed = VestigeFeed::with_base_url(&server.url()).unwrap();
        let err = feed
            .fetch(&["ALGO/USDC".to_string(), "ALGO/USDT".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::SourceUnavailable { .. }));
    }
}
