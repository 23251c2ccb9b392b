//! Tinyman price feed adapter

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;
use crate::{
    errors::{EngineError, EngineResult},
    network::build_http_client,
    types::PriceRecord,
};

const TINYMAN_BASE_URL: &str = "https://mainnet.analytics.tinyman.org";
const TINYMAN_FEE_PCT: Decimal = dec!(0.3);

pub struct TinymanFeed {
    client: reqwest::Client,
    base_url: String,
}

impl TinymanFeed {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            base_url: TINYMAN_BASE_URL.to_string(),
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
            source_name: "tinyman".to_string(),
            message,
            source,
            retry_count: 0,
        }
    }

    async fn fetch_pair(&self, pair: &str) -> EngineResult<PriceRecord> {
        // Tinyman keys pairs with a dash: ALGO/USDC -> ALGO-USDC
        let url = format!(
            "{}/api/v1/prices/{}",
            self.base_url,
            pair.replace('/', "-")
        );

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

        let price_str = json["price"]
            .as_str()
            .ok_or_else(|| self.unavailable(format!("missing 'price' for {}", pair), None))?;
        let price = Decimal::from_str(price_str)
            .map_err(|e| self.unavailable("unparseable price".to_string(), Some(e.into())))?;

        let volume_str = json["volume_24h"]
            .as_str()
            .ok_or_else(|| self.unavailable(format!("missing 'volume_24h' for {}", pair), None))?;
        let volume_24h = Decimal::from_str(volume_str)
            .map_err(|e| self.unavailable("unparseable volume".to_string(), Some(e.into())))?;

        Ok(PriceRecord {
            pair: pair.to_string(),
            source: "tinyman".to_string(),
            price,
            volume_24h,
            fee_pct: TINYMAN_FEE_PCT,
            observed_at: Utc::now(),
        })
    }
}

#[async_trait::async_trait]
impl super::PriceFeed for TinymanFeed {
    fn name(&self) -> &str {
        "tinyman"
    }

    fn fee_pct(&self) -> Decimal {
        TINYMAN_FEE_PCT
    }

    async fn fetch(&self, pairs: &[String]) -> EngineResult<Vec<PriceRecord>> {
        let mut records = Vec::with_capacity(pairs.len());
        for pair in pairs {
            records.push(self.fetch_pair(pair).await?);
        }
        Ok(records)
    }
}
