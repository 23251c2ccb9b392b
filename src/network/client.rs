//! Shared HTTP client construction

use std::time::Duration;
use anyhow::{Context, Result};
use crate::config::HTTP_TIMEOUT_SECONDS;

/// Client with the hard per-request timeout every adapter call must carry.
pub fn build_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECONDS))
        .build()
        .context("Failed to build HTTP client")
}
