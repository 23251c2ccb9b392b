//! Strategy configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrategyKind {
    Arbitrage,
    YieldFarming,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Arbitrage => write!(f, "arbitrage"),
            StrategyKind::YieldFarming => write!(f, "yield_farming"),
        }
    }
}

/// Per-kind settings. Known options are typed fields; anything else a
/// caller supplies lands in `extra` untouched.
#[derive(Debug, Clone, Serialize)]
pub enum StrategySettings {
    Arbitrage(ArbitrageSettings),
    YieldFarming(YieldFarmingSettings),
}

#[derive(Debug, Clone, Serialize)]
pub struct ArbitrageSettings {
    pub min_spread_pct: Decimal,
    pub max_execution_time_secs: u64,
    pub supported_pairs: Vec<String>,
    pub dex_priorities: Vec<String>,
    pub extra: HashMap<String, String>,
}

impl Default for ArbitrageSettings {
    fn default() -> Self {
        Self {
            min_spread_pct: dec!(0.5),
            max_execution_time_secs: 30,
            supported_pairs: vec!["ALGO/USDC".to_string(), "ALGO/USDT".to_string()],
            dex_priorities: vec![
                "tinyman".to_string(),
                "pact".to_string(),
                "vestige".to_string(),
            ],
            extra: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YieldFarmingSettings {
    pub target_apy: Decimal,
    pub max_pools: u32,
    pub rebalance_frequency_hours: u64,
    pub min_pool_tvl: Decimal,
    pub max_pool_allocation_pct: Decimal,
    pub min_spread_pct: Decimal,
    pub supported_pairs: Vec<String>,
    pub extra: HashMap<String, String>,
}

impl Default for YieldFarmingSettings {
    fn default() -> Self {
        Self {
            target_apy: dec!(15),
            max_pools: 5,
            rebalance_frequency_hours: 24,
            min_pool_tvl: dec!(100000),
            max_pool_allocation_pct: dec!(30),
            min_spread_pct: dec!(0.3),
            supported_pairs: vec!["ALGO/USDC".to_string()],
            extra: HashMap::new(),
        }
    }
}

impl StrategySettings {
    /// Defaults for `kind` merged with caller-supplied overrides. Known
    /// keys are parsed into their typed fields; a known key that fails to
    /// parse is a configuration error, unknown keys are preserved in
    /// `extra`.
    pub fn merged(
        kind: StrategyKind,
        strategy_name: &str,
        overrides: &HashMap<String, String>,
    ) -> EngineResult<Self> {
        let bad = |key: &str, value: &str| EngineError::Configuration {
            strategy: strategy_name.to_string(),
            message: format!("invalid value '{}' for setting '{}'", value, key),
        };

        match kind {
            StrategyKind::Arbitrage => {
                let mut s = ArbitrageSettings::default();
                for (key, value) in overrides {
                    match key.as_str() {
                        "min_spread_pct" => {
                            s.min_spread_pct =
                                Decimal::from_str(value).map_err(|_| bad(key, value))?;
                        }
                        "max_execution_time" => {
                            s.max_execution_time_secs =
                                value.parse().map_err(|_| bad(key, value))?;
                        }
                        "supported_pairs" => {
                            s.supported_pairs = parse_list(value);
                        }
                        "dex_priorities" => {
                            s.dex_priorities = parse_list(value);
                        }
                        _ => {
                            s.extra.insert(key.clone(), value.clone());
                        }
                    }
                }
                if s.min_spread_pct <= Decimal::ZERO {
                    return Err(EngineError::Configuration {
                        strategy: strategy_name.to_string(),
                        message: "min_spread_pct must be positive".to_string(),
                    });
                }
                if s.supported_pairs.is_empty() {
                    return Err(EngineError::Configuration {
                        strategy: strategy_name.to_string(),
                        message: "supported_pairs must not be empty".to_string(),
                    });
                }
                Ok(StrategySettings::Arbitrage(s))
            }
            StrategyKind::YieldFarming => {
                let mut s = YieldFarmingSettings::default();
                for (key, value) in overrides {
                    match key.as_str() {
                        "target_apy" => {
                            s.target_apy =
                                Decimal::from_str(value).map_err(|_| bad(key, value))?;
                        }
                        "max_pools" => {
                            s.max_pools = value.parse().map_err(|_| bad(key, value))?;
                        }
                        "rebalance_frequency_hours" => {
                            s.rebalance_frequency_hours =
                                value.parse().map_err(|_| bad(key, value))?;
                        }
                        "min_pool_tvl" => {
                            s.min_pool_tvl =
                                Decimal::from_str(value).map_err(|_| bad(key, value))?;
                        }
                        "max_pool_allocation_pct" => {
                            s.max_pool_allocation_pct =
                                Decimal::from_str(value).map_err(|_| bad(key, value))?;
                        }
                        "min_spread_pct" => {
                            s.min_spread_pct =
                                Decimal::from_str(value).map_err(|_| bad(key, value))?;
                        }
                        "supported_pairs" => {
                            s.supported_pairs = parse_list(value);
                        }
                        _ => {
                            s.extra.insert(key.clone(), value.clone());
                        }
                    }
                }
                if s.max_pools == 0 || s.rebalance_frequency_hours == 0 {
                    return Err(EngineError::Configuration {
                        strategy: strategy_name.to_string(),
                        message: "max_pools and rebalance_frequency_hours must be positive"
                            .to_string(),
                    });
                }
                Ok(StrategySettings::YieldFarming(s))
            }
        }
    }

    pub fn supported_pairs(&self) -> &[String] {
        match self {
            StrategySettings::Arbitrage(s) => &s.supported_pairs,
            StrategySettings::YieldFarming(s) => &s.supported_pairs,
        }
    }

    pub fn min_spread_pct(&self) -> Decimal {
        match self {
            StrategySettings::Arbitrage(s) => s.min_spread_pct,
            StrategySettings::YieldFarming(s) => s.min_spread_pct,
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// One configured strategy. Owned by the orchestrator; mutated only through
/// explicit configuration updates.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyConfig {
    pub name: String,
    pub kind: StrategyKind,
    pub is_active: bool,
    pub allocated_capital: Decimal,
    pub max_position_size: Decimal,
    pub min_profit_threshold: Decimal,
    pub settings: StrategySettings,
}

impl StrategyConfig {
    pub fn new(
        name: &str,
        kind: StrategyKind,
        allocated_capital: Decimal,
        max_position_size: Decimal,
        min_profit_threshold: Decimal,
        overrides: &HashMap<String, String>,
    ) -> EngineResult<Self> {
        if allocated_capital <= Decimal::ZERO {
            return Err(EngineError::Configuration {
                strategy: name.to_string(),
                message: "allocated_capital must be positive".to_string(),
            });
        }
        if max_position_size <= Decimal::ZERO {
            return Err(EngineError::Configuration {
                strategy: name.to_string(),
                message: "max_position_size must be positive".to_string(),
            });
        }
        if min_profit_threshold < Decimal::ZERO {
            return Err(EngineError::Configuration {
                strategy: name.to_string(),
                message: "min_profit_threshold must not be negative".to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            kind,
            is_active: true,
            allocated_capital,
            max_position_size,
            min_profit_threshold,
            settings: StrategySettings::merged(kind, name, overrides)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_merge_with_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("min_spread_pct".to_string(), "0.8".to_string());
        overrides.insert("custom_flag".to_string(), "yes".to_string());

        let settings =
            StrategySettings::merged(StrategyKind::Arbitrage, "arb", &overrides).unwrap();
        match settings {
            StrategySettings::Arbitrage(s) => {
                assert_eq!(s.min_spread_pct, dec!(0.8));
                assert_eq!(s.max_execution_time_secs, 30);
                assert_eq!(s.extra.get("custom_flag").unwrap(), "yes");
            }
            _ => panic!("wrong settings kind"),
        }
    }

    #[test]
    fn malformed_override_is_a_configuration_error() {
        let mut overrides = HashMap::new();
        overrides.insert("min_spread_pct".to_string(), "not-a-number".to_string());

        let err = StrategySettings::merged(StrategyKind::Arbitrage, "arb", &overrides)
            .unwrap_err();
        assert!(matches!(err, EngineError::Configuration { .. }));
    }

    #[test]
    fn non_positive_capital_rejected() {
        let err = StrategyConfig::new(
            "arb",
            StrategyKind::Arbitrage,
            Decimal::ZERO,
            dec!(100),
            dec!(1),
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Configuration { .. }));
    }
}
