//! Cross-source outlier rejection via z-score

use rust_decimal::prelude::ToPrimitive;
use tracing::debug;
use crate::{
    config::OUTLIER_Z_SCORE_THRESHOLD,
    types::PriceRecord,
    utils::{mean, std_dev, z_score},
};

/// Drop records whose price deviates from the consensus of the *other*
/// sources by more than the z-score threshold. Each candidate is scored
/// against a leave-one-out mean and standard deviation, so a single wild
/// tick cannot inflate the deviation enough to hide itself. With fewer
/// than two sources there is no consensus to check, and a zero standard
/// deviation across all sources accepts everything.
pub fn validate_cross_source(records: Vec<PriceRecord>) -> Vec<PriceRecord> {
    if records.len() < 2 {
        return records;
    }

    let prices: Vec<f64> = records
        .iter()
        .map(|r| r.price.to_f64().unwrap_or(0.0))
        .collect();

    if std_dev(&prices) == 0.0 {
        return records;
    }

    records
        .into_iter()
        .enumerate()
        .filter(|(i, record)| {
            let others: Vec<f64> = prices
                .iter()
                .enumerate()
                .filter(|(j, _)| j != i)
                .map(|(_, p)| *p)
                .collect();
            // A single remaining source is no consensus to score against.
            if others.len() < 2 {
                return true;
            }
            let m = mean(&others);
            let sd = std_dev(&others);

            let is_outlier = if sd == 0.0 {
                // All other sources agree exactly; any deviation is suspect.
                prices[*i] != m
            } else {
                z_score(prices[*i], m, sd) > OUTLIER_Z_SCORE_THRESHOLD
            };

            if is_outlier {
                debug!(
                    "Rejecting outlier from {}: {} {} deviates from consensus {:.6}",
                    record.source, record.pair, record.price, m
                );
            }
            !is_outlier
        })
        .map(|(_, record)| record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn record(source: &str, price: Decimal) -> PriceRecord {
        PriceRecord {
            pair: "ALGO/USDC".to_string(),
            source: source.to_string(),
            price,
            volume_24h: dec!(100000),
            fee_pct: dec!(0.3),
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn rejects_single_large_outlier() {
        let records = vec![
            record("a", dec!(100)),
            record("b", dec!(101)),
            record("c", dec!(99)),
            record("d", dec!(1000)),
        ];
        let accepted = validate_cross_source(records);
        assert_eq!(accepted.len(), 3);
        assert!(accepted.iter().all(|r| r.price < dec!(1000)));
    }

    #[test]
    fn zero_std_dev_accepts_all() {
        let records = vec![
            record("a", dec!(100)),
            record("b", dec!(100)),
            record("c", dec!(100)),
        ];
        assert_eq!(validate_cross_source(records).len(), 3);
    }

    #[test]
    fn close_prices_all_accepted() {
        let records = vec![
            record("a", dec!(0.1801)),
            record("b", dec!(0.1805)),
            record("c", dec!(0.1798)),
        ];
        assert_eq!(validate_cross_source(records).len(), 3);
    }

    #[test]
    fn two_differing_sources_are_both_kept() {
        let records = vec![record("a", dec!(0.1234)), record("b", dec!(0.1267))];
        assert_eq!(validate_cross_source(records).len(), 2);
    }

    #[test]
    fn single_record_passes_through() {
        let records = vec![record("a", dec!(100))];
        assert_eq!(validate_cross_source(records).len(), 1);
    }
}
