//! Portfolio-level risk limit types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Process-wide limits for one orchestrator instance. Daily counters that
/// these limits bound live in the risk manager and reset once per
/// calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct RiskLimits {
    pub max_daily_loss: Decimal,
    pub max_position_size: Decimal,
    pub max_daily_trades: u32,
    pub total_capital: Decimal,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_daily_loss: dec!(500),
            max_position_size: dec!(1000),
            max_daily_trades: 50,
            total_capital: dec!(10000),
        }
    }
}
