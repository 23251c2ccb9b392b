//! Strategy orchestration
//!
//! Owns the strategy roster, drives the scan/rank/execute cycle, and keeps
//! the execution history the risk manager's daily reset reads from. A
//! single orchestrator instance owns a given capital pool at a time.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, warn};
use crate::{
    cache::PriceCache,
    config::PRICE_MAX_AGE_SECONDS,
    errors::{EngineError, EngineResult},
    execution::Executor,
    risk::RiskManager,
    scanner::{rank_opportunities, OpportunityScanner},
    storage,
    types::{
        Opportunity, PriceKey, PriceRecord, StrategyConfig, StrategySettings, TradeResult,
    },
    utils,
};

/// Per-cycle outcome counts, folded into the session totals.
#[derive(Debug, Default, Clone)]
pub struct CycleSummary {
    pub opportunities_found: usize,
    pub executions_attempted: usize,
    pub executions_successful: usize,
}

pub struct StrategyOrchestrator {
    strategies: Vec<StrategyConfig>,
    scanner: OpportunityScanner,
    executor: Box<dyn Executor>,
    risk: Arc<RiskManager>,
    cache: Arc<PriceCache>,
    history: Vec<TradeResult>,
    last_rebalance: HashMap<String, DateTime<Utc>>,
    max_executions_per_cycle: usize,
    persist: bool,
    execution_enabled: bool,
    // Session totals
    pub total_opportunities: u64,
    pub executed_trades: u64,
    pub successful_trades: u64,
    pub total_profit: Decimal,
    pub error_counts: HashMap<String, u32>,
}

impl StrategyOrchestrator {
    pub fn new(
        cache: Arc<PriceCache>,
        risk: Arc<RiskManager>,
        executor: Box<dyn Executor>,
        scanner: OpportunityScanner,
        max_executions_per_cycle: usize,
    ) -> Self {
        Self {
            strategies: Vec::new(),
            scanner,
            executor,
            risk,
            cache,
            history: Vec::new(),
            last_rebalance: HashMap::new(),
            max_executions_per_cycle,
            persist: true,
            execution_enabled: true,
            total_opportunities: 0,
            executed_trades: 0,
            successful_trades: 0,
            total_profit: Decimal::ZERO,
            error_counts: HashMap::new(),
        }
    }

    pub fn with_persistence(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Scan-only mode: opportunities are still detected, ranked, and
    /// persisted, but nothing reaches the executor.
    pub fn with_execution_enabled(mut self, enabled: bool) -> Self {
        self.execution_enabled = enabled;
        self
    }

    /// Register one strategy. The cumulative allocated capital across
    /// active strategies must stay within the pool's total capital.
    pub fn register_strategy(&mut self, strategy: StrategyConfig) -> EngineResult<()> {
        let allocated: Decimal = self
            .strategies
            .iter()
            .filter(|s| s.is_active)
            .map(|s| s.allocated_capital)
            .sum();

        if allocated + strategy.allocated_capital > self.risk.limits().total_capital {
            return Err(EngineError::Configuration {
                strategy: strategy.name.clone(),
                message: format!(
                    "allocated capital {} would exceed total capital {}",
                    allocated + strategy.allocated_capital,
                    self.risk.limits().total_capital
                ),
            });
        }

        self.strategies.push(strategy);
        Ok(())
    }

    pub fn strategies(&self) -> &[StrategyConfig] {
        &self.strategies
    }

    pub fn history(&self) -> &[TradeResult] {
        &self.history
    }

    /// One full tick: daily reset, scan every active strategy, rank the
    /// merged list, execute the top N. A failure for one strategy or one
    /// opportunity never aborts the rest of the cycle.
    pub async fn run_cycle(&mut self) -> CycleSummary {
        let mut summary = CycleSummary::default();

        self.risk.reset_daily_if_needed(&self.history).await;

        let snapshot = self.cache.get_fresh(PRICE_MAX_AGE_SECONDS).await;
        if snapshot.is_empty() {
            debug!("Cache snapshot is empty, nothing to scan");
            return summary;
        }

        let mut all_opportunities = Vec::new();
        for strategy in self.strategies.iter().filter(|s| s.is_active) {
            let found = self.scanner.scan(strategy, &snapshot);
            if !found.is_empty() {
                debug!(
                    "Strategy {} found {} opportunit(ies)",
                    strategy.name,
                    found.len()
                );
            }
            all_opportunities.extend(found);
        }

        summary.opportunities_found = all_opportunities.len();
        self.total_opportunities += all_opportunities.len() as u64;

        let ranked = rank_opportunities(all_opportunities);

        for opportunity in ranked.into_iter().take(self.max_executions_per_cycle) {
            utils::print_opportunity(&opportunity);
            if self.persist {
                if let Err(e) = storage::save_opportunity(&opportunity) {
                    error!("Failed to save opportunity: {}", e);
                    *self
                        .error_counts
                        .entry("save_opportunity".to_string())
                        .or_insert(0) += 1;
                }
            }

            if !self.execution_enabled {
                continue;
            }

            let Some(strategy) = self
                .strategies
                .iter()
                .find(|s| s.name == opportunity.strategy)
                .cloned()
            else {
                warn!(
                    "Opportunity {} references unknown strategy {}",
                    opportunity.id, opportunity.strategy
                );
                continue;
            };

            if !self.should_execute(&strategy, &opportunity, &snapshot) {
                debug!(
                    "Strategy {} declined opportunity {}",
                    strategy.name, opportunity.id
                );
                continue;
            }

            let result = self.executor.execute(&opportunity, &strategy).await;
            summary.executions_attempted += 1;
            self.executed_trades += 1;

            if result.success {
                summary.executions_successful += 1;
                self.successful_trades += 1;
                self.total_profit += result.actual_profit;
                if strategy.kind == crate::types::StrategyKind::YieldFarming {
                    self.last_rebalance
                        .insert(strategy.name.clone(), Utc::now());
                }
            } else {
                *self
                    .error_counts
                    .entry(
                        result
                            .reason
                            .map(|r| r.to_string())
                            .unwrap_or_else(|| "unknown_rejection".to_string()),
                    )
                    .or_insert(0) += 1;
            }

            self.risk.record(&result).await;
            utils::print_trade_result(&result);

            if self.persist {
                if let Err(e) = storage::save_trade_result(&result) {
                    error!("Failed to save trade result: {}", e);
                    *self
                        .error_counts
                        .entry("save_trade_result".to_string())
                        .or_insert(0) += 1;
                }
            }

            self.history.push(result);
        }

        summary
    }

    /// Strategy-specific gate ahead of the executor's own checks.
    fn should_execute(
        &self,
        strategy: &StrategyConfig,
        opportunity: &Opportunity,
        snapshot: &HashMap<PriceKey, PriceRecord>,
    ) -> bool {
        match &strategy.settings {
            StrategySettings::Arbitrage(s) => opportunity.spread_pct >= s.min_spread_pct,
            StrategySettings::YieldFarming(s) => {
                let rebalance_due = self
                    .last_rebalance
                    .get(&strategy.name)
                    .map(|last| {
                        Utc::now() - *last
                            >= Duration::hours(s.rebalance_frequency_hours as i64)
                    })
                    .unwrap_or(true);
                if !rebalance_due {
                    return false;
                }

                // Pool eligibility: buy-side 24h volume stands in for TVL.
                let buy_key = PriceKey::new(&opportunity.buy_source, &opportunity.pair);
                snapshot
                    .get(&buy_key)
                    .map(|record| record.volume_24h >= s.min_pool_tvl)
                    .unwrap_or(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{SimulatedExecutor, SimulationParams};
    use crate::scanner::ScannerParams;
    use crate::types::{RiskLimits, StrategyKind};
    use rust_decimal_macros::dec;

    fn instant_executor(risk: &Arc<RiskManager>) -> Box<dyn Executor> {
        Box::new(SimulatedExecutor::new(
            Arc::clone(risk),
            SimulationParams {
                base_latency_ms: 0,
                latency_jitter_ms: 0,
                ..Default::default()
            },
        ))
    }

    fn orchestrator(cache: Arc<PriceCache>) -> StrategyOrchestrator {
        let risk = Arc::new(RiskManager::new(RiskLimits::default()));
        let executor = instant_executor(&risk);
        StrategyOrchestrator::new(
            cache,
            risk,
            executor,
            OpportunityScanner::new(ScannerParams::default()),
            5,
        )
        .with_persistence(false)
    }

    fn arb_strategy(name: &str, capital: Decimal) -> StrategyConfig {
        let mut overrides = HashMap::new();
        overrides.insert("min_spread_pct".to_string(), "0.5".to_string());
        overrides.insert("supported_pairs".to_string(), "ALGO/USDC".to_string());
        StrategyConfig::new(
            name,
            StrategyKind::Arbitrage,
            capital,
            dec!(1000),
            dec!(0.1),
            &overrides,
        )
        .unwrap()
    }

    async fn seed_cache(cache: &PriceCache) {
        for (source, price) in [("tinyman", dec!(0.1234)), ("pact", dec!(0.1267))] {
            cache
                .put(crate::types::PriceRecord {
                    pair: "ALGO/USDC".to_string(),
                    source: source.to_string(),
                    price,
                    volume_24h: dec!(200000),
                    fee_pct: dec!(0.3),
                    observed_at: Utc::now(),
                })
                .await;
        }
    }

    #[tokio::test]
    async fn over_allocation_is_a_configuration_error() {
        let cache = Arc::new(PriceCache::default());
        let mut orch = orchestrator(cache);

        orch.register_strategy(arb_strategy("a", dec!(6000))).unwrap();
        let err = orch
            .register_strategy(arb_strategy("b", dec!(6000)))
            .unwrap_err();
        assert!(matches!(err, EngineError::Configuration { .. }));
    }

    #[tokio::test]
    async fn cycle_scans_executes_and_records_history() {
        let cache = Arc::new(PriceCache::default());
        seed_cache(&cache).await;
        let mut orch = orchestrator(Arc::clone(&cache));
        orch.register_strategy(arb_strategy("arb", dec!(5000))).unwrap();

        let summary = orch.run_cycle().await;

        assert_eq!(summary.opportunities_found, 1);
        assert_eq!(summary.executions_attempted, 1);
        assert_eq!(summary.executions_successful, 1);
        assert_eq!(orch.history().len(), 1);
        assert!(orch.history()[0].success);
    }

    #[tokio::test]
    async fn empty_cache_yields_an_empty_cycle() {
        let cache = Arc::new(PriceCache::default());
        let mut orch = orchestrator(cache);
        orch.register_strategy(arb_strategy("arb", dec!(5000))).unwrap();

        let summary = orch.run_cycle().await;
        assert_eq!(summary.opportunities_found, 0);
        assert_eq!(summary.executions_attempted, 0);
    }

    #[tokio::test]
    async fn disabled_execution_scans_without_trading() {
        let cache = Arc::new(PriceCache::default());
        seed_cache(&cache).await;
        let mut orch = orchestrator(Arc::clone(&cache)).with_execution_enabled(false);
        orch.register_strategy(arb_strategy("arb", dec!(5000))).unwrap();

        let summary = orch.run_cycle().await;
        assert_eq!(summary.opportunities_found, 1);
        assert_eq!(summary.executions_attempted, 0);
        assert!(orch.history().is_empty());
    }

    #[tokio::test]
    async fn inactive_strategies_are_skipped() {
        let cache = Arc::new(PriceCache::default());
        seed_cache(&cache).await;
        let mut orch = orchestrator(Arc::clone(&cache));
        let mut strategy = arb_strategy("arb", dec!(5000));
        strategy.is_active = false;
        orch.register_strategy(strategy).unwrap();

        let summary = orch.run_cycle().await;
        assert_eq!(summary.opportunities_found, 0);
    }

    #[tokio::test]
    async fn yield_farming_respects_the_rebalance_gate() {
        let cache = Arc::new(PriceCache::default());
        seed_cache(&cache).await;
        let mut orch = orchestrator(Arc::clone(&cache));

        let mut overrides = HashMap::new();
        overrides.insert("min_spread_pct".to_string(), "0.5".to_string());
        overrides.insert("supported_pairs".to_string(), "ALGO/USDC".to_string());
        overrides.insert("min_pool_tvl".to_string(), "100000".to_string());
        overrides.insert("rebalance_frequency_hours".to_string(), "24".to_string());
        let strategy = StrategyConfig::new(
            "yield",
            StrategyKind::YieldFarming,
            dec!(3000),
            dec!(1000),
            dec!(0.1),
            &overrides,
        )
        .unwrap();
        orch.register_strategy(strategy).unwrap();

        // First cycle executes and stamps the rebalance time.
        let first = orch.run_cycle().await;
        assert_eq!(first.executions_successful, 1);

        // Second cycle inside the rebalance window declines to trade.
        let second = orch.run_cycle().await;
        assert_eq!(second.executions_attempted, 0);
    }

    #[tokio::test]
    async fn high_tvl_floor_blocks_yield_farming_pools() {
        let cache = Arc::new(PriceCache::default());
        seed_cache(&cache).await;
        let mut orch = orchestrator(Arc::clone(&cache));

        let mut overrides = HashMap::new();
        overrides.insert("min_spread_pct".to_string(), "0.5".to_string());
        overrides.insert("supported_pairs".to_string(), "ALGO/USDC".to_string());
        // Above the 200k volume seeded into the cache
        overrides.insert("min_pool_tvl".to_string(), "500000".to_string());
        let strategy = StrategyConfig::new(
            "yield",
            StrategyKind::YieldFarming,
            dec!(3000),
            dec!(1000),
            dec!(0.1),
            &overrides,
        )
        .unwrap();
        orch.register_strategy(strategy).unwrap();

        let summary = orch.run_cycle().await;
        assert_eq!(summary.opportunities_found, 1);
        assert_eq!(summary.executions_attempted, 0);
    }
}
