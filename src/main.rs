//! Algorand multi-DEX arbitrage simulator - Main Entry Point

use algo_arb_sim::*;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let _logging_guard = utils::setup_logging()?;
    utils::setup_output_directories()?;

    // Load configuration
    let config = CONFIG.clone();

    info!("🛰️  Algorand Arbitrage Simulator v0.1.0 - Multi-DEX Price Aggregation");
    info!("📋 Configuration:");
    info!("   Scan Interval: {}s", config.scan_interval_secs);
    info!("   Poll Interval: {}s", config.poll_interval_secs);
    info!("   Total Capital: ${}", config.total_capital);
    info!("   Max Daily Trades: {}", config.max_daily_trades);
    info!("   Max Daily Loss: ${}", config.max_daily_loss);
    info!("   Trade Execution: {}", config.enable_trade_execution);
    if config.enable_trade_execution {
        info!("   ⚠️  SIMULATION MODE - No real funds at risk");
    } else {
        info!("   👀 Scan-only mode - opportunities logged, nothing executed");
    }

    // Initialize shared components
    let cache = Arc::new(cache::PriceCache::default());
    let fallback = Arc::new(feeds::FallbackManager::default());
    let risk = Arc::new(risk::RiskManager::new(config.risk_limits()));

    // Build strategies; a misconfigured strategy must not come up active
    let mut orchestrator = orchestrator::StrategyOrchestrator::new(
        Arc::clone(&cache),
        Arc::clone(&risk),
        Box::new(execution::SimulatedExecutor::new(
            Arc::clone(&risk),
            execution::SimulationParams::default(),
        )),
        scanner::OpportunityScanner::default(),
        config.max_executions_per_cycle,
    )
    .with_execution_enabled(config.enable_trade_execution);

    let arb = StrategyConfig::new(
        "cross-dex-arbitrage",
        StrategyKind::Arbitrage,
        config.arb_allocated_capital,
        config.max_position_size,
        config.arb_min_profit,
        &HashMap::new(),
    )?;
    orchestrator.register_strategy(arb)?;

    let yield_farming = StrategyConfig::new(
        "stable-yield-rotation",
        StrategyKind::YieldFarming,
        config.yield_allocated_capital,
        config.max_position_size,
        config.yield_min_profit,
        &HashMap::new(),
    )?;
    orchestrator.register_strategy(yield_farming)?;

    info!("✅ Registered {} strategies", orchestrator.strategies().len());

    // Spawn one polling worker per source
    let feed_list = feeds::default_feeds()?;
    let all_pairs: Vec<String> = {
        let mut pairs: Vec<String> = orchestrator
            .strategies()
            .iter()
            .flat_map(|s| s.settings.supported_pairs().to_vec())
            .collect();
        pairs.sort();
        pairs.dedup();
        pairs
    };
    info!("📡 Monitoring pairs: {:?}", all_pairs);

    let poller_handles = feeds::spawn_pollers(
        feed_list,
        Arc::clone(&fallback),
        Arc::clone(&cache),
        all_pairs,
        config.poll_interval_secs,
    );

    // Setup shutdown handler
    let start_time = Instant::now();
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel();
    let shutdown_tx = Arc::new(tokio::sync::Mutex::new(Some(shutdown_tx)));

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
        info!("\n📛 Received shutdown signal (Ctrl+C)...");
        if let Some(tx) = shutdown_tx.lock().await.take() {
            let _ = tx.send(());
        }
    });

    info!("\n🚀 Starting orchestration loop...\n");

    let mut interval = time::interval(Duration::from_secs(config.scan_interval_secs));
    let mut cycles: u64 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                cycles += 1;
                let summary = orchestrator.run_cycle().await;
                if summary.opportunities_found > 0 {
                    info!(
                        "Cycle {}: {} opportunities, {} executed, {} successful",
                        cycles,
                        summary.opportunities_found,
                        summary.executions_attempted,
                        summary.executions_successful
                    );
                }

                // Periodic health and session reports
                if cycles % 10 == 0 {
                    let health = utils::run_health_check(&fallback, &cache, start_time).await;
                    utils::print_health_status(&health);
                }
                if cycles % 20 == 0 {
                    utils::print_session_stats(
                        start_time,
                        orchestrator.total_opportunities,
                        orchestrator.executed_trades,
                        orchestrator.successful_trades,
                        orchestrator.total_profit,
                        &orchestrator.error_counts,
                    );
                }

                let total_errors: u32 = orchestrator.error_counts.values().sum();
                if total_errors > 1000 {
                    error!("Too many total errors ({}), consider restarting", total_errors);
                }
            }
            _ = &mut shutdown_rx => {
                info!("Shutdown signal received, exiting main loop...");
                break;
            }
        }
    }

    for handle in poller_handles {
        handle.abort();
    }

    print_final_statistics(start_time, &orchestrator);

    Ok(())
}

/// Print final statistics on shutdown
fn print_final_statistics(
    start_time: Instant,
    orchestrator: &orchestrator::StrategyOrchestrator,
) {
    info!("\n🛑 Shutting down gracefully...");
    info!("Final statistics:");
    info!("   Total runtime: {:?}", start_time.elapsed());
    info!("   Opportunities detected: {}", orchestrator.total_opportunities);
    info!("   Trades attempted: {}", orchestrator.executed_trades);
    info!("   Successful trades: {}", orchestrator.successful_trades);
    info!("   Simulated profit: ${:.2}", orchestrator.total_profit);
    info!("   Errors: {:?}", orchestrator.error_counts);
}
