//! Trade execution seam and simulator

pub mod engine;
pub mod simulation;

pub use engine::*;
pub use simulation::*;
