//! Core data types and structures

pub mod price;
pub mod opportunity;
pub mod execution;
pub mod strategy;
pub mod risk;
pub mod health;

pub use price::*;
pub use opportunity::*;
pub use execution::*;
pub use strategy::*;
pub use risk::*;
pub use health::*;
