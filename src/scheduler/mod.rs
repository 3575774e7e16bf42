//! Trading loop orchestration
//!
//! A single task ticks at a fixed interval. Each tick writes the daily
//! summary when due, squares off at end of day, reloads strategies on a
//! cadence, then polls every resolved symbol in turn.

mod clock;
mod runner;

pub use clock::SessionClock;
pub use runner::{Scheduler, SchedulerSettings, TickReport};
