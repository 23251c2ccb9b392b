//! Arbitrage opportunity types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Opportunity {
    pub id: String,
    pub strategy: String,
    pub pair: String,
    pub buy_source: String,
    pub sell_source: String,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    /// Relative spread in percent: (sell - buy) / buy * 100.
    pub spread_pct: Decimal,
    pub required_capital: Decimal,
    pub expected_profit: Decimal,
    /// Heuristic in [0, confidence_cap]; larger spreads score higher.
    pub confidence: f64,
    pub detected_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Opportunity {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Ranking key used across all strategies: expected profit weighted
    /// by confidence.
    pub fn rank_score(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        self.expected_profit.to_f64().unwrap_or(0.0) * self.confidence
    }
}
