//! Custom error types for the engine

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Source unavailable: {source_name} - {message}")]
    SourceUnavailable {
        source_name: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        retry_count: u32,
    },

    #[error("Price validation rejected: {source_name} price {price} - {reason}")]
    ValidationRejected {
        source_name: String,
        price: Decimal,
        reason: String,
    },

    #[error("Configuration error for strategy '{strategy}': {message}")]
    Configuration {
        strategy: String,
        message: String,
    },

    #[error("Storage error: {context}")]
    Storage {
        context: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
