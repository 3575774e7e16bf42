//! Positions and the open-position book

use super::ExitReason;
use crate::execution::OrderSide;
use crate::ledger::TradeRecord;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Position direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Side of the order that opens a position in this direction
    pub fn entry_side(self) -> OrderSide {
        match self {
            Direction::Long => OrderSide::Buy,
            Direction::Short => OrderSide::Sell,
        }
    }

    /// Side of the order that closes it
    pub fn exit_side(self) -> OrderSide {
        match self {
            Direction::Long => OrderSide::Sell,
            Direction::Short => OrderSide::Buy,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// An open position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub direction: Direction,
    pub entry_price: Decimal,
    /// Highest price since entry for longs, lowest for shorts
    pub extreme_price: Decimal,
    pub quantity: u32,
    pub entry_time: DateTime<Utc>,
}

impl Position {
    /// Open a position at `price`
    pub fn open(
        symbol: impl Into<String>,
        direction: Direction,
        price: Decimal,
        quantity: u32,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            direction,
            entry_price: price,
            extreme_price: price,
            quantity,
            entry_time,
        }
    }

    /// Move the extreme price in the favorable direction only
    pub fn update_extreme(&mut self, price: Decimal) {
        self.extreme_price = match self.direction {
            Direction::Long => self.extreme_price.max(price),
            Direction::Short => self.extreme_price.min(price),
        };
    }

    /// P&L if closed at `price`
    pub fn pnl_at(&self, price: Decimal) -> Decimal {
        let qty = Decimal::from(self.quantity);
        match self.direction {
            Direction::Long => qty * (price - self.entry_price),
            Direction::Short => qty * (self.entry_price - price),
        }
    }

    /// Build the trade record for closing at `price`
    pub fn close(&self, price: Decimal, exit_time: DateTime<Utc>, reason: ExitReason) -> TradeRecord {
        TradeRecord {
            symbol: self.symbol.clone(),
            direction: self.direction,
            entry_time: self.entry_time,
            entry_price: self.entry_price,
            exit_time,
            exit_price: price,
            quantity: self.quantity,
            realized_pnl: self.pnl_at(price),
            exit_reason: reason,
        }
    }
}

/// Open positions, at most one per symbol per direction
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    longs: BTreeMap<String, Position>,
    shorts: BTreeMap<String, Position>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, direction: Direction) -> &BTreeMap<String, Position> {
        match direction {
            Direction::Long => &self.longs,
            Direction::Short => &self.shorts,
        }
    }

    fn side_mut(&mut self, direction: Direction) -> &mut BTreeMap<String, Position> {
        match direction {
            Direction::Long => &mut self.longs,
            Direction::Short => &mut self.shorts,
        }
    }

    pub fn get(&self, symbol: &str, direction: Direction) -> Option<&Position> {
        self.side(direction).get(symbol)
    }

    pub fn get_mut(&mut self, symbol: &str, direction: Direction) -> Option<&mut Position> {
        self.side_mut(direction).get_mut(symbol)
    }

    pub fn contains(&self, symbol: &str, direction: Direction) -> bool {
        self.side(direction).contains_key(symbol)
    }

    /// Insert a position; refused if one already exists for its symbol and side
    pub fn insert(&mut self, position: Position) -> bool {
        let side = self.side_mut(position.direction);
        if side.contains_key(&position.symbol) {
            return false;
        }
        side.insert(position.symbol.clone(), position);
        true
    }

    pub fn remove(&mut self, symbol: &str, direction: Direction) -> Option<Position> {
        self.side_mut(direction).remove(symbol)
    }

    /// Long + short positions across all symbols
    pub fn total(&self) -> usize {
        self.longs.len() + self.shorts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All open positions, longs first
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.longs.values().chain(self.shorts.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_extreme_monotonic_long() {
        let mut position = Position::open("INFY", Direction::Long, dec!(100), 10, Utc::now());
        let mut last = position.extreme_price;
        for price in [dec!(101), dec!(99), dec!(103), dec!(102)] {
            position.update_extreme(price);
            assert!(position.extreme_price >= last);
            last = position.extreme_price;
        }
        assert_eq!(position.extreme_price, dec!(103));
    }

    #[test]
    fn test_extreme_monotonic_short() {
        let mut position = Position::open("INFY", Direction::Short, dec!(100), 10, Utc::now());
        let mut last = position.extreme_price;
        for price in [dec!(99), dec!(101), dec!(97), dec!(98)] {
            position.update_extreme(price);
            assert!(position.extreme_price <= last);
            last = position.extreme_price;
        }
        assert_eq!(position.extreme_price, dec!(97));
    }

    #[test]
    fn test_pnl() {
        let long = Position::open("A", Direction::Long, dec!(100), 10, Utc::now());
        let short = Position::open("A", Direction::Short, dec!(100), 10, Utc::now());
        assert_eq!(long.pnl_at(dec!(102)), dec!(20));
        assert_eq!(short.pnl_at(dec!(102)), dec!(-20));
    }

    #[test]
    fn test_close_builds_record() {
        let position = Position::open("SBIN", Direction::Short, dec!(600), 5, Utc::now());
        let trade = position.close(dec!(590), Utc::now(), ExitReason::TrailingStop);
        assert_eq!(trade.realized_pnl, dec!(50));
        assert_eq!(trade.direction, Direction::Short);
        assert_eq!(trade.quantity, 5);
    }

    #[test]
    fn test_book_one_per_side() {
        let mut book = PositionBook::new();
        assert!(book.insert(Position::open("A", Direction::Long, dec!(10), 1, Utc::now())));
        assert!(!book.insert(Position::open("A", Direction::Long, dec!(11), 1, Utc::now())));
        assert!(book.insert(Position::open("A", Direction::Short, dec!(10), 1, Utc::now())));

        assert_eq!(book.total(), 2);
        assert_eq!(book.get("A", Direction::Long).unwrap().entry_price, dec!(10));

        book.remove("A", Direction::Long);
        assert!(!book.contains("A", Direction::Long));
        assert!(book.contains("A", Direction::Short));
    }

    #[test]
    fn test_direction_sides() {
        assert_eq!(Direction::Long.entry_side(), OrderSide::Buy);
        assert_eq!(Direction::Long.exit_side(), OrderSide::Sell);
        assert_eq!(Direction::Short.entry_side(), OrderSide::Sell);
        assert_eq!(Direction::Short.exit_side(), OrderSide::Buy);
    }
}
