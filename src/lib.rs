//! intraday-engine: intraday equity trading agent
//!
//! This library provides the core components for:
//! - Brokerage gateway access with self-healing sessions
//! - Ticker to instrument-token resolution with an on-disk cache
//! - Per-symbol session range and price history tracking
//! - Externally generated per-symbol strategy parameters
//! - Breakout/bounce/breakdown/quick-drop entries with stop, target and
//!   trailing exits
//! - Paper/live order execution
//! - Trade ledger, daily summary and trade log
//! - A fixed-interval scheduler with end-of-day square-off

pub mod cli;
pub mod config;
pub mod engine;
pub mod execution;
pub mod gateway;
pub mod instrument;
pub mod ledger;
pub mod price;
pub mod scheduler;
pub mod strategy;
pub mod telemetry;
