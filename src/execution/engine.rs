//! Execution seam and the simulated implementation
//!
//! `Executor` is the injection point for a real order router; everything
//! upstream (scanning, ranking, risk checks) works unchanged against any
//! implementation.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use crate::{
    risk::RiskManager,
    types::{Opportunity, RejectReason, StrategyConfig, TradeResult},
};
use super::{create_simulated_fill, SimulationParams};

#[async_trait]
pub trait Executor: Send + Sync {
    /// Attempt one execution. Business-rule rejections come back as
    /// unsuccessful results carrying the reason, never as errors.
    async fn execute(&self, opportunity: &Opportunity, strategy: &StrategyConfig)
        -> TradeResult;
}

pub struct SimulatedExecutor {
    risk: Arc<RiskManager>,
    params: SimulationParams,
}

impl SimulatedExecutor {
    pub fn new(risk: Arc<RiskManager>, params: SimulationParams) -> Self {
        Self { risk, params }
    }

    fn validate(&self, opportunity: &Opportunity, strategy: &StrategyConfig) -> bool {
        opportunity.expected_profit >= strategy.min_profit_threshold
            && opportunity.required_capital <= strategy.max_position_size
            && opportunity.required_capital <= strategy.allocated_capital
    }
}

#[async_trait]
impl Executor for SimulatedExecutor {
    async fn execute(
        &self,
        opportunity: &Opportunity,
        strategy: &StrategyConfig,
    ) -> TradeResult {
        let start = Instant::now();

        if opportunity.is_expired(chrono::Utc::now()) {
            debug!("Opportunity {} expired before execution", opportunity.id);
            return TradeResult::rejected(
                &opportunity.id,
                &strategy.name,
                RejectReason::OpportunityExpired,
            );
        }

        if !self.validate(opportunity, strategy) {
            debug!(
                "Opportunity {} failed validation against strategy {}",
                opportunity.id, strategy.name
            );
            return TradeResult::rejected(
                &opportunity.id,
                &strategy.name,
                RejectReason::ValidationFailed,
            );
        }

        if let Err(reason) = self.risk.check(opportunity.required_capital).await {
            debug!("Opportunity {} blocked by risk limits", opportunity.id);
            return TradeResult::rejected(&opportunity.id, &strategy.name, reason);
        }

        info!("🚀 Simulating execution for opportunity {}", opportunity.id);
        create_simulated_fill(opportunity, &self.params, start).await
    }
}
