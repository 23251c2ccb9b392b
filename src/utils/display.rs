//! Display and printing utilities

use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn, error};
use crate::types::{HealthStatus, Opportunity, TradeResult};

pub fn print_session_stats(
    start_time: Instant,
    total_opportunities: u64,
    executed_trades: u64,
    successful_trades: u64,
    total_profit: rust_decimal::Decimal,
    error_counts: &HashMap<String, u32>,
) {
    let runtime = start_time.elapsed().as_secs() / 60;

    info!("\n📊 Session Statistics ({} minutes)", runtime);
    info!("   📈 SCANNING:");
    info!("     Opportunities detected: {}", total_opportunities);
    info!("   🚀 EXECUTION:");
    info!("     Trades attempted: {}", executed_trades);
    info!("     Successful: {}", successful_trades);
    info!("     Success rate: {:.1}%",
        if executed_trades > 0 {
            (successful_trades as f64 / executed_trades as f64) * 100.0
        } else {
            0.0
        }
    );
    info!("     Simulated profit: ${:.2}", total_profit);

    if !error_counts.is_empty() {
        info!("   ⚙️  Error summary:");
        for (error_type, count) in error_counts.iter() {
            info!("       {}: {}", error_type, count);
        }
    }

    info!("");
}

pub fn print_health_status(health: &HealthStatus) {
    info!(
        "🏥 Health Check: sources {}/{} healthy, cache entries: {}, uptime: {}s",
        health.healthy_sources,
        health.sources.len(),
        health.cached_entries,
        health.uptime_seconds
    );
    for (name, h) in health.sources.iter() {
        if !h.active {
            warn!(
                "   ⚠️ {} unhealthy (errors: {}, cooldown until: {:?})",
                name, h.error_count, h.cooldown_until
            );
        }
    }
}

pub fn print_opportunity(opp: &Opportunity) {
    warn!("\n🎯 OPPORTUNITY #{}", opp.id);
    warn!("📍 Pair: {} ({})", opp.pair, opp.strategy);
    warn!("💰 Spread Analysis:");
    warn!("   Buy  {} @ ${:.6}", opp.buy_source, opp.buy_price);
    warn!("   Sell {} @ ${:.6}", opp.sell_source, opp.sell_price);
    warn!("   Spread: {:.3}%", opp.spread_pct);
    warn!("   Capital: ${:.2}", opp.required_capital);
    warn!("   Expected Profit: ${:.4}", opp.expected_profit);
    warn!("   Confidence: {:.2}", opp.confidence);
}

pub fn print_trade_result(result: &TradeResult) {
    if result.success {
        warn!("\n✅ TRADE EXECUTED #{}", result.id);
        warn!("📍 Strategy: {}", result.strategy);
        warn!("   Amount: ${:.2}", result.executed_amount);
        warn!("   Expected Profit: ${:.4}", result.expected_profit);
        warn!("   Actual Profit: ${:.4}", result.actual_profit);
        warn!("   Slippage: {:.3}%", result.slippage_pct);
        if let Some(tx_ref) = &result.tx_ref {
            warn!("   Tx Ref: {}", tx_ref);
        }
        warn!("   Execution Time: {}ms", result.execution_time_ms);
    } else {
        error!(
            "\n❌ TRADE REJECTED #{} ({}): {}",
            result.id,
            result.strategy,
            result
                .reason
                .map(|r| r.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    }
}
