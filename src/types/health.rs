//! Health monitoring types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Per-source health state, owned by the fallback manager.
#[derive(Debug, Clone, Serialize)]
pub struct SourceHealth {
    pub active: bool,
    pub last_success_at: Option<DateTime<Utc>>,
    pub error_count: u32,
    /// Set while the source is in its unhealthy cooldown window.
    pub cooldown_until: Option<DateTime<Utc>>,
}

impl Default for SourceHealth {
    fn default() -> Self {
        Self {
            active: true,
            last_success_at: None,
            error_count: 0,
            cooldown_until: None,
        }
    }
}

/// Snapshot produced for the periodic status report.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub sources: HashMap<String, SourceHealth>,
    pub healthy_sources: usize,
    pub cached_entries: usize,
    pub uptime_seconds: u64,
}
