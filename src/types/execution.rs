//! Trade execution result types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Outcome of one execution attempt. Created once, appended to history.
#[derive(Debug, Clone, Serialize)]
pub struct TradeResult {
    pub id: String,
    pub opportunity_id: String,
    pub strategy: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub executed_amount: Decimal,
    pub expected_profit: Decimal,
    pub actual_profit: Decimal,
    pub slippage_pct: Decimal,
    pub execution_time_ms: u64,
    pub reason: Option<RejectReason>,
    pub tx_ref: Option<String>,
}

impl TradeResult {
    pub fn rejected(opportunity_id: &str, strategy: &str, reason: RejectReason) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            opportunity_id: opportunity_id.to_string(),
            strategy: strategy.to_string(),
            timestamp: Utc::now(),
            success: false,
            executed_amount: Decimal::ZERO,
            expected_profit: Decimal::ZERO,
            actual_profit: Decimal::ZERO,
            slippage_pct: Decimal::ZERO,
            execution_time_ms: 0,
            reason: Some(reason),
            tx_ref: None,
        }
    }
}

/// Business-rule rejection, carried as a value rather than an error so the
/// orchestrator can record it and move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    OpportunityExpired,
    ValidationFailed,
    RiskLimitExceeded,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::OpportunityExpired => write!(f, "opportunity expired"),
            RejectReason::ValidationFailed => write!(f, "opportunity failed validation"),
            RejectReason::RiskLimitExceeded => write!(f, "risk limit exceeded"),
        }
    }
}
