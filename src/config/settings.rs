//! Engine configuration settings and environment variable handling

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

// Validation constants
pub const PRICE_MAX_AGE_SECONDS: u64 = 300;
pub const MAX_CHANGE_PCT_PER_MINUTE: Decimal = dec!(10);
pub const OUTLIER_Z_SCORE_THRESHOLD: f64 = 3.0;

// Cache constants
pub const CACHE_MAX_SIZE: usize = 10_000;
pub const CACHE_CLEANUP_THRESHOLD: f64 = 0.8;
pub const CACHE_PURGE_AGE_SECONDS: u64 = 3600;

// Fallback constants
pub const FALLBACK_COOLDOWN_SECONDS: u64 = 600; // 10 minutes
pub const MAX_FETCH_ATTEMPTS: u32 = 3;
pub const HTTP_TIMEOUT_SECONDS: u64 = 10;

// Scanner constants
pub const OPPORTUNITY_TTL_SECONDS: i64 = 30;
pub const CONFIDENCE_BASE: f64 = 0.7;
pub const CONFIDENCE_SLOPE: f64 = 10.0;
pub const CONFIDENCE_CAP: f64 = 0.95;

// Execution simulation constants
pub const MIN_SLIPPAGE_PCT: Decimal = dec!(0.1);
pub const MAX_SLIPPAGE_PCT: Decimal = dec!(0.5);

#[derive(Debug, Clone)]
pub struct Config {
    pub scan_interval_secs: u64,
    pub poll_interval_secs: u64,
    pub max_executions_per_cycle: usize,
    pub enable_trade_execution: bool,
    // Risk configuration
    pub total_capital: Decimal,
    pub max_daily_loss: Decimal,
    pub max_position_size: Decimal,
    pub max_daily_trades: u32,
    // Strategy defaults
    pub arb_allocated_capital: Decimal,
    pub arb_min_profit: Decimal,
    pub yield_allocated_capital: Decimal,
    pub yield_min_profit: Decimal,
}

impl Config {
    pub fn load() -> Self {
        Self {
            scan_interval_secs: env::var("SCAN_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30)
                .max(1),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30)
                .max(1),
            max_executions_per_cycle: env::var("MAX_EXECUTIONS_PER_CYCLE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            enable_trade_execution: env::var("ENABLE_TRADE_EXECUTION")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            total_capital: env::var("TOTAL_CAPITAL")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(10000)),
            max_daily_loss: env::var("MAX_DAILY_LOSS")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(500)),
            max_position_size: env::var("MAX_POSITION_SIZE")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(1000)),
            max_daily_trades: env::var("MAX_DAILY_TRADES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50),
            arb_allocated_capital: env::var("ARB_ALLOCATED_CAPITAL")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(5000)),
            arb_min_profit: env::var("ARB_MIN_PROFIT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(1.0)),
            yield_allocated_capital: env::var("YIELD_ALLOCATED_CAPITAL")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(3000)),
            yield_min_profit: env::var("YIELD_MIN_PROFIT")
                .ok()
                .and_then(|s| Decimal::from_str(&s).ok())
                .unwrap_or(dec!(0.5)),
        }
    }

    pub fn risk_limits(&self) -> crate::types::RiskLimits {
        crate::types::RiskLimits {
            max_daily_loss: self.max_daily_loss,
            max_position_size: self.max_position_size,
            max_daily_trades: self.max_daily_trades,
            total_capital: self.total_capital,
        }
    }
}
