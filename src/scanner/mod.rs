//! Opportunity detection over a cache snapshot

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use tracing::debug;
use crate::{
    config::{CONFIDENCE_BASE, CONFIDENCE_CAP, CONFIDENCE_SLOPE, OPPORTUNITY_TTL_SECONDS},
    types::{Opportunity, PriceKey, PriceRecord, StrategyConfig},
    validation::validate_cross_source,
};

/// Tuning knobs for sizing and scoring. The confidence heuristic and the
/// sizing fractions are carried-over reference values, not calibrated
/// constants; treat them as candidates for refitting against real data.
#[derive(Debug, Clone)]
pub struct ScannerParams {
    /// Fraction of the strategy's allocated capital committed per trade.
    pub capital_fraction: Decimal,
    /// Fraction of buy-side 24h volume treated as usable liquidity.
    pub liquidity_fraction: Decimal,
    pub confidence_base: f64,
    pub confidence_slope: f64,
    pub confidence_cap: f64,
    pub opportunity_ttl_secs: i64,
}

impl Default for ScannerParams {
    fn default() -> Self {
        Self {
            capital_fraction: dec!(0.10),
            liquidity_fraction: dec!(0.05),
            confidence_base: CONFIDENCE_BASE,
            confidence_slope: CONFIDENCE_SLOPE,
            confidence_cap: CONFIDENCE_CAP,
            opportunity_ttl_secs: OPPORTUNITY_TTL_SECONDS,
        }
    }
}

#[derive(Default)]
pub struct OpportunityScanner {
    params: ScannerParams,
}

impl OpportunityScanner {
    pub fn new(params: ScannerParams) -> Self {
        Self { params }
    }

    /// Scan one strategy's supported pairs over a cache snapshot. Pairs
    /// with fewer than two sources are skipped; that is an empty result,
    /// not an error.
    pub fn scan(
        &self,
        strategy: &StrategyConfig,
        snapshot: &HashMap<PriceKey, PriceRecord>,
    ) -> Vec<Opportunity> {
        let mut opportunities = Vec::new();

        for pair in strategy.settings.supported_pairs() {
            let records: Vec<PriceRecord> = snapshot
                .iter()
                .filter(|(key, _)| &key.pair == pair)
                .map(|(_, record)| record.clone())
                .collect();

            if records.len() < 2 {
                debug!(
                    "Skipping {}: only {} source(s) with fresh data",
                    pair,
                    records.len()
                );
                continue;
            }

            let records = validate_cross_source(records);
            if records.len() < 2 {
                debug!("Skipping {}: consensus left fewer than 2 sources", pair);
                continue;
            }

            if let Some(opp) = self.evaluate_pair(strategy, pair, &records) {
                opportunities.push(opp);
            }
        }

        opportunities
    }

    fn evaluate_pair(
        &self,
        strategy: &StrategyConfig,
        pair: &str,
        records: &[PriceRecord],
    ) -> Option<Opportunity> {
        let buy = records.iter().min_by_key(|r| r.price)?;
        let sell = records.iter().max_by_key(|r| r.price)?;

        if buy.price <= dec!(0) {
            return None;
        }

        let spread_pct = (sell.price - buy.price) / buy.price * dec!(100);
        if spread_pct <= strategy.settings.min_spread_pct() {
            return None;
        }

        let trade_amount = (strategy.allocated_capital * self.params.capital_fraction)
            .min(buy.volume_24h * self.params.liquidity_fraction);
        if trade_amount <= dec!(0) {
            return None;
        }

        let spread_frac = spread_pct / dec!(100);
        let round_trip_fee_frac = (buy.fee_pct + sell.fee_pct) / dec!(100);
        let expected_profit =
            trade_amount * spread_frac - trade_amount * round_trip_fee_frac;

        if expected_profit <= strategy.min_profit_threshold {
            return None;
        }

        let confidence = (self.params.confidence_base
            + spread_frac.to_f64().unwrap_or(0.0) * self.params.confidence_slope)
            .min(self.params.confidence_cap);

        let now = Utc::now();
        Some(Opportunity {
            id: uuid::Uuid::new_v4().to_string(),
            strategy: strategy.name.clone(),
            pair: pair.to_string(),
            buy_source: buy.source.clone(),
            sell_source: sell.source.clone(),
            buy_price: buy.price,
            sell_price: sell.price,
            spread_pct,
            required_capital: trade_amount,
            expected_profit,
            confidence,
            detected_at: now,
            expires_at: now + Duration::seconds(self.params.opportunity_ttl_secs),
        })
    }
}

/// The sole ranking rule, applied within and across strategies: expected
/// profit weighted by confidence, descending. Stable, so the result is
/// deterministic for a fixed snapshot.
pub fn rank_opportunities(mut opportunities: Vec<Opportunity>) -> Vec<Opportunity> {
    opportunities.sort_by(|a, b| {
        b.rank_score()
            .partial_cmp(&a.rank_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    opportunities
}
