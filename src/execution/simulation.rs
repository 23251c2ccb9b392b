//! Synthetic fill generation
//!
//! Stands in for a real order router: latency and slippage are drawn from
//! configured bands and the "fill" is a bookkeeping entry, nothing more.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use std::time::{Duration, Instant};
use tracing::info;
use crate::config::{MAX_SLIPPAGE_PCT, MIN_SLIPPAGE_PCT};
use crate::types::{Opportunity, TradeResult};

/// Reference band values; recalibrate against real execution data before
/// trusting any derived statistics.
#[derive(Debug, Clone)]
pub struct SimulationParams {
    pub min_slippage_pct: Decimal,
    pub max_slippage_pct: Decimal,
    pub base_latency_ms: u64,
    pub latency_jitter_ms: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            min_slippage_pct: MIN_SLIPPAGE_PCT,
            max_slippage_pct: MAX_SLIPPAGE_PCT,
            base_latency_ms: 100,
            latency_jitter_ms: 150,
        }
    }
}

pub async fn create_simulated_fill(
    opportunity: &Opportunity,
    params: &SimulationParams,
    start_time: Instant,
) -> TradeResult {
    let latency = params.base_latency_ms
        + (rand::random::<f64>() * params.latency_jitter_ms as f64) as u64;
    tokio::time::sleep(Duration::from_millis(latency)).await;

    let band = params.max_slippage_pct - params.min_slippage_pct;
    let slippage_pct = params.min_slippage_pct
        + band * Decimal::from_f64(rand::random::<f64>()).unwrap_or(dec!(0.5));

    // Slippage hits both legs of the round trip.
    let actual_profit =
        opportunity.expected_profit * (dec!(1) - slippage_pct * dec!(2) / dec!(100));

    let tx_ref = format!(
        "SIM-{}",
        uuid::Uuid::new_v4().to_string().replace('-', "").to_uppercase()
    );

    info!(
        "🎭 Simulated fill for {}: slippage {:.3}%, profit ${:.4}",
        opportunity.pair, slippage_pct, actual_profit
    );

    TradeResult {
        id: uuid::Uuid::new_v4().to_string(),
        opportunity_id: opportunity.id.clone(),
        strategy: opportunity.strategy.clone(),
        timestamp: Utc::now(),
        success: true,
        executed_amount: opportunity.required_capital,
        expected_profit: opportunity.expected_profit,
        actual_profit,
        slippage_pct,
        execution_time_ms: start_time.elapsed().as_millis() as u64,
        reason: None,
        tx_ref: Some(tx_ref),
    }
}
