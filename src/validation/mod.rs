//! Price record validation: per-record sanity and cross-source consensus

pub mod record;
pub mod consensus;

pub use record::*;
pub use consensus::*;
