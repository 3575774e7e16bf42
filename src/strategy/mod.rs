//! Strategy configuration module
//!
//! Per-symbol thresholds produced by an external generator and read back from
//! a JSON file. The engine never writes this file.

mod generator;
mod params;
mod source;
mod store;

pub use generator::StrategyGenerator;
pub use params::StrategyParams;
pub use source::{FileStrategySource, StrategySource};
pub use store::StrategyStore;
