//! Price bookkeeping module
//!
//! Per-symbol session range and a short sliding window of recent prices

mod tracker;

pub use tracker::{Observation, PriceHistory, PriceRange, PriceTracker};
