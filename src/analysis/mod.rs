//! Aggregation modules.

pub mod aggregator;

pub use aggregator::*;
