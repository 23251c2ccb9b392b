//! Trade result persistence

use tracing::info;
use crate::errors::{EngineError, EngineResult};
use crate::types::TradeResult;

pub fn save_trade_result(result: &TradeResult) -> EngineResult<()> {
    let line = serde_json::to_string(result).map_err(|e| EngineError::Storage {
        context: format!("serializing trade result {}", result.id),
        source: e.into(),
    })?;

    super::append_jsonl("output/executions", "executions", &line)?;

    info!(
        trade_id = %result.id,
        strategy = %result.strategy,
        success = result.success,
        actual_profit = %result.actual_profit,
        "Saved trade result"
    );

    Ok(())
}
