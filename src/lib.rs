//! Multi-DEX price aggregation and arbitrage simulation engine for the
//! Algorand network
//!
//! Polls several DEX price APIs into a shared validated cache, scans the
//! cached prices for cross-venue spreads, and runs candidate trades
//! through a simulated executor under portfolio-level risk limits.

pub mod config;
pub mod types;
pub mod errors;
pub mod network;
pub mod feeds;
pub mod validation;
pub mod cache;
pub mod scanner;
pub mod execution;
pub mod risk;
pub mod orchestrator;
pub mod storage;
pub mod utils;

// Re-export commonly used items
pub use config::{Config, CONFIG};
pub use errors::{EngineError, EngineResult};
pub use types::*;
