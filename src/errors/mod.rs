//! Error types for the aggregation engine

pub mod engine_error;

pub use engine_error::*;
