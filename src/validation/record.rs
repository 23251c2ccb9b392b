//! Per-record sanity checks

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::{
    config::{MAX_CHANGE_PCT_PER_MINUTE, PRICE_MAX_AGE_SECONDS},
    errors::{EngineError, EngineResult},
    types::PriceRecord,
};

/// Validate one incoming record, optionally against the previous accepted
/// record for the same (source, pair) key. Rules run in order; the first
/// failing rule rejects the record.
pub fn validate_record(
    record: &PriceRecord,
    previous: Option<&PriceRecord>,
) -> EngineResult<()> {
    let reject = |reason: String| EngineError::ValidationRejected {
        source_name: record.source.clone(),
        price: record.price,
        reason,
    };

    if record.price <= dec!(0) {
        return Err(reject("price is zero or negative".to_string()));
    }
    if record.volume_24h < dec!(0) {
        return Err(reject("volume is negative".to_string()));
    }

    let age = record.age_seconds(Utc::now());
    if age > PRICE_MAX_AGE_SECONDS {
        return Err(reject(format!(
            "record is stale: {}s old (max {}s)",
            age, PRICE_MAX_AGE_SECONDS
        )));
    }

    if let Some(prev) = previous {
        if prev.price > dec!(0) {
            let change_pct = (record.price - prev.price).abs() / prev.price * dec!(100);
            // Budget scales with the actual gap; a zero gap still gets
            // one second's worth.
            let minutes = Decimal::from(
                ((record.observed_at - prev.observed_at).num_seconds().max(0) as u64).max(1),
            ) / dec!(60);
            let allowed = MAX_CHANGE_PCT_PER_MINUTE * minutes;
            if change_pct > allowed {
                return Err(reject(format!(
                    "price moved {:.2}% since previous tick (allowed {:.2}%)",
                    change_pct, allowed
                )));
            }
        }
    }

    Ok(())
}
