//! Pact price feed adapter

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use crate::{
    errors::{EngineError, EngineResult},
    network::build_http_client,
    types::PriceRecord,
};

const PACT_BASE_URL: &str = "https://api.pact.fi";
const PACT_FEE_PCT: Decimal = dec!(0.25);

pub struct PactFeed {
    client: reqwest::Client,
    base_url: String,
}

impl PactFeed {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            base_url: PACT_BASE_URL.to_string(),
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
            source_name: "pact".to_string(),
            message,
            source,
            retry_count: 0,
        }
    }

    async fn fetch_pair(&self, pair: &str) -> EngineResult<PriceRecord> {
        let url = format!("{}/api/pools?pair={}", self.base_url, pair);

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

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| self.unavailable("invalid JSON response".to_string(), Some(e.into())))?;

        // Pact returns one entry per pool; the first is the deepest.
        let pool = json["pools"]
            .as_array()
            .and_then(|pools| pools.first())
            .ok_or_else(|| self.unavailable(format!("no pools for {}", pair), None))?;

        let price = pool["price"]
            .as_f64()
            .and_then(Decimal::from_f64)
            .ok_or_else(|| self.unavailable(format!("missing 'price' for {}", pair), None))?;
        let volume_24h = pool["volume_24h"]
            .as_f64()
            .and_then(Decimal::from_f64)
            .ok_or_else(|| self.unavailable(format!("missing 'volume_24h' for {}", pair), None))?;

        Ok(PriceRecord {
            pair: pair.to_string(),
            source: "pact".to_string(),
            price,
            volume_24h,
            fee_pct: PACT_FEE_PCT,
            observed_at: Utc::now(),
        })
    }
}

#[async_trait::async_trait]
impl super::PriceFeed for PactFeed {
    fn name(&self) -> &str {
        "pact"
    }

    fn fee_pct(&self) -> Decimal {
        PACT_FEE_PCT
    }

    async fn fetch(&self, pairs: &[String]) -> EngineResult<Vec<PriceRecord>> {
        let mut records = Vec::with_capacity(pairs.len());
        for pair in pairs {
            records.push(self.fetch_pair(pair).await?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::PriceFeed;

    #[tokio::test]
    async fn parses_first_pool() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/pools")
            .match_query(mockito::Matcher::UrlEncoded(
                "pair".into(),
                "ALGO/USDC".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"pools": [
                    {"price": 0.1831, "volume_24h": 180000.0},
                    {"price": 0.1829, "volume_24h": 12000.0}
                ]}"#,
            )
            .create_async()
            .await;

        let feed = PactFeed::with_base_url(&server.url()).unwrap();
        let records = feed.fetch(&["ALGO/USDC".to_string()]).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "pact");
        assert_eq!(records[0].price, dec!(0.1831));
    }

    #[tokio::test]
    async fn empty_pool_list_is_source_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/pools")
            .match_query(mockito::Matcher::UrlEncoded(
                "pair".into(),
                "ALGO/USDC".into(),
            ))
            .with_status(200)
            .with_body(r#"{"pools": []}"#)
            .create_async()
            .await;

        let feed = PactFeed::with_base_url(&server.url()).unwrap();
        let err = feed.fetch(&["ALGO/USDC".to_string()]).await.unwrap_err();
        assert!(matches!(err, EngineError::SourceUnavailable { .. }));
    }
}
