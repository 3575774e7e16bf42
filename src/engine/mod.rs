//! Strategy & position engine
//!
//! Turns each price observation into entry and exit decisions:
//! - `signal`: pure entry detectors and position sizing
//! - `exit`: stop-loss, target and trailing-stop rules
//! - `position`: open positions, at most one per symbol per side
//! - `processor`: runs a cycle against the shared state and the executor

mod exit;
mod position;
mod processor;
mod signal;
mod state;

pub use exit::{evaluate_exit, ExitReason};
pub use position::{Direction, Position, PositionBook};
pub use processor::{CycleReport, EngineSettings, PositionEngine};
pub use signal::{
    detect_entries, is_bounce_back, is_breakdown, is_breakout, is_quick_drop, position_size,
    EntryThresholds, EntryTrigger,
};
pub use state::EngineState;
