//! Trade ledger module
//!
//! Closed trades for the current day, realized P&L, and the durable trade log.

mod daily;
mod journal;
mod types;

pub use daily::TradeLedger;
pub use journal::TradeJournal;
pub use types::{DailySummary, TradeRecord};
