//! Ledger types

use crate::engine::{Direction, ExitReason};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A closed trade; never modified after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub direction: Direction,
    pub entry_time: DateTime<Utc>,
    pub entry_price: Decimal,
    pub exit_time: DateTime<Utc>,
    pub exit_price: Decimal,
    pub quantity: u32,
    pub realized_pnl: Decimal,
    pub exit_reason: ExitReason,
}

impl std::fmt::Display for TradeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EXIT {} {} @ {:.2} Qty: {} P&L: {:.2} Reason: {}",
            self.direction,
            self.symbol,
            self.exit_price,
            self.quantity,
            self.realized_pnl,
            self.exit_reason
        )
    }
}

/// End-of-day aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub trade_count: usize,
    pub net_pnl: Decimal,
    pub long_pnl: Decimal,
    pub short_pnl: Decimal,
}

impl DailySummary {
    /// Human-readable lines for the trade log
    pub fn lines(&self) -> Vec<String> {
        if self.trade_count == 0 {
            return vec!["Daily Summary: No trades executed today".to_string()];
        }

        let rule = "=".repeat(55);
        vec![
            rule.clone(),
            "DAILY TRADE & P&L SUMMARY".to_string(),
            format!("Date: {}", self.date.format("%Y-%m-%d")),
            format!("Total Trades: {}", self.trade_count),
            format!("Net P&L: {:.2}", self.net_pnl),
            format!("Long Trades P&L: {:.2}", self.long_pnl),
            format!("Short Trades P&L: {:.2}", self.short_pnl),
            rule,
        ]
    }
}
