//! Daily trade ledger

use super::{DailySummary, TradeRecord};
use crate::engine::Direction;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Closed trades since the last daily summary
#[derive(Debug, Clone, Default)]
pub struct TradeLedger {
    trades: Vec<TradeRecord>,
    daily_pnl: Decimal,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a closed trade
    pub fn record(&mut self, trade: TradeRecord) {
        self.daily_pnl += trade.realized_pnl;
        self.trades.push(trade);
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn daily_pnl(&self) -> Decimal {
        self.daily_pnl
    }

    /// Realized P&L of trades in one direction
    pub fn pnl_for(&self, direction: Direction) -> Decimal {
        self.trades
            .iter()
            .filter(|t| t.direction == direction)
            .map(|t| t.realized_pnl)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Aggregate the day without clearing
    pub fn summarize(&self, date: NaiveDate) -> DailySummary {
        DailySummary {
            date,
            trade_count: self.trades.len(),
            net_pnl: self.daily_pnl,
            long_pnl: self.pnl_for(Direction::Long),
            short_pnl: self.pnl_for(Direction::Short),
        }
    }

    /// Aggregate the day, then clear trades and reset daily P&L
    pub fn close_day(&mut self, date: NaiveDate) -> DailySummary {
        let summary = self.summarize(date);
        self.trades.clear();
        self.daily_pnl = Decimal::ZERO;
        summary
    }
}
