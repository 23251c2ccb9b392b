//! Portfolio-level risk accounting
//!
//! One manager per orchestrator instance owns the daily counters that the
//! risk limits bound. Counters reset exactly once per calendar day; the
//! orchestrator drives the reset at the top of each cycle.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::info;
use crate::types::{RejectReason, RiskLimits, TradeResult};

#[derive(Debug, Clone)]
struct RiskState {
    daily_trades: u32,
    daily_loss: Decimal,
    last_reset: NaiveDate,
    previous_day_pnl: Decimal,
}

pub struct RiskManager {
    limits: RiskLimits,
    state: RwLock<RiskState>,
}

impl RiskManager {
    pub fn new(limits: RiskLimits) -> Self {
        Self {
            limits,
            state: RwLock::new(RiskState {
                daily_trades: 0,
                daily_loss: Decimal::ZERO,
                last_reset: Utc::now().date_naive(),
                previous_day_pnl: Decimal::ZERO,
            }),
        }
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Gate checked before every execution attempt.
    pub async fn check(&self, amount: Decimal) -> Result<(), RejectReason> {
        let state = self.state.read().await;

        if state.daily_trades >= self.limits.max_daily_trades {
            return Err(RejectReason::RiskLimitExceeded);
        }
        if state.daily_loss >= self.limits.max_daily_loss {
            return Err(RejectReason::RiskLimitExceeded);
        }
        if amount > self.limits.max_position_size {
            return Err(RejectReason::RiskLimitExceeded);
        }
        if amount > self.limits.total_capital {
            return Err(RejectReason::RiskLimitExceeded);
        }

        Ok(())
    }

    /// Fold one execution outcome into the daily counters. Only successful
    /// trades count against the daily trade budget; losses accumulate
    /// toward the daily loss cap.
    pub async fn record(&self, result: &TradeResult) {
        let mut state = self.state.write().await;
        if result.success {
            state.daily_trades += 1;
            if result.actual_profit < Decimal::ZERO {
                state.daily_loss += -result.actual_profit;
            }
        }
    }

    /// Reset daily counters if the calendar day has advanced. Returns true
    /// when a reset actually happened; calling again within the same day
    /// is a no-op.
    pub async fn reset_daily_if_needed(&self, history: &[TradeResult]) -> bool {
        let today = Utc::now().date_naive();
        let mut state = self.state.write().await;

        if today <= state.last_reset {
            return false;
        }

        let previous_day = state.last_reset;
        state.previous_day_pnl = history
            .iter()
            .filter(|r| r.success && r.timestamp.date_naive() == previous_day)
            .map(|r| r.actual_profit)
            .sum();
        state.daily_trades = 0;
        state.daily_loss = Decimal::ZERO;
        state.last_reset = today;

        info!(
            "📅 Daily counters reset; {} P&L was ${:.2}",
            previous_day, state.previous_day_pnl
        );
        true
    }

    pub async fn daily_trades(&self) -> u32 {
        self.state.read().await.daily_trades
    }

    pub async fn daily_loss(&self) -> Decimal {
        self.state.read().await.daily_loss
    }

    pub async fn previous_day_pnl(&self) -> Decimal {
        self.state.read().await.previous_day_pnl
    }
}
