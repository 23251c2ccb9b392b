//! HTTP client construction and retry helpers

pub mod client;
pub mod retry;

pub use client::*;
pub use retry::*;
