//! Opportunity persistence

use tracing::info;
use crate::errors::{EngineError, EngineResult};
use crate::types::Opportunity;

pub fn save_opportunity(opp: &Opportunity) -> EngineResult<()> {
    let line = serde_json::to_string(opp).map_err(|e| EngineError::Storage {
        context: format!("serializing opportunity {}", opp.id),
        source: e.into(),
    })?;

    super::append_jsonl("output/opportunities", "opportunities", &line)?;

    info!(
        opportunity_id = %opp.id,
        pair = %opp.pair,
        spread_pct = %opp.spread_pct,
        expected_profit = %opp.expected_profit,
        "Saved opportunity"
    );

    Ok(())
}
