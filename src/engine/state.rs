//! Shared engine state

use super::PositionBook;
use crate::instrument::TokenMap;
use crate::ledger::TradeLedger;
use crate::price::PriceTracker;
use crate::strategy::StrategyStore;

/// Everything the trading loop mutates
///
/// Held behind one async mutex. The lock is taken per symbol and never held
/// across a price fetch.
#[derive(Debug)]
pub struct EngineState {
    pub positions: PositionBook,
    pub prices: PriceTracker,
    pub strategies: StrategyStore,
    pub instruments: TokenMap,
    pub ledger: TradeLedger,
}

impl EngineState {
    pub fn new(history_window: usize, strategies: StrategyStore, instruments: TokenMap) -> Self {
        Self {
            positions: PositionBook::new(),
            prices: PriceTracker::new(history_window),
            strategies,
            instruments,
            ledger: TradeLedger::new(),
        }
    }
}
