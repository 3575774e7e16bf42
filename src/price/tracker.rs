//! Session range and recent-price tracking

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Running session high/low; zero means unset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub high: Decimal,
    pub low: Decimal,
}

impl PriceRange {
    /// Whether at least one price has been observed
    pub fn is_set(&self) -> bool {
        !self.high.is_zero() && !self.low.is_zero()
    }

    /// Widen the range to include `price`
    pub fn observe(&mut self, price: Decimal) {
        if self.high.is_zero() || price > self.high {
            self.high = price;
        }
        if self.low.is_zero() || price < self.low {
            self.low = price;
        }
    }
}

/// Bounded window of the most recent prices, oldest first
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    window: usize,
    prices: VecDeque<Decimal>,
}

impl PriceHistory {
    /// Create a history holding at most `window` prices
    pub fn new(window: usize) -> Self {
        Self {
            window,
            prices: VecDeque::with_capacity(window + 1),
        }
    }

    /// Append a price, evicting the oldest once over the window
    pub fn push(&mut self, price: Decimal) {
        self.prices.push_back(price);
        while self.prices.len() > self.window {
            self.prices.pop_front();
        }
    }

    /// Most recent price
    pub fn latest(&self) -> Option<Decimal> {
        self.prices.back().copied()
    }

    /// Price observed just before the latest one
    pub fn previous(&self) -> Option<Decimal> {
        let len = self.prices.len();
        if len < 2 {
            return None;
        }
        self.prices.get(len - 2).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Prices in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Decimal> {
        self.prices.iter()
    }
}

/// What the detectors need to know about one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// The price just observed
    pub price: Decimal,
    /// Session range before this price was folded in
    pub prior_range: PriceRange,
    /// Session range including this price
    pub range: PriceRange,
    /// Price observed immediately before this one
    pub previous: Option<Decimal>,
    /// Samples in the history window after this observation
    pub samples: usize,
}

/// Per-symbol ranges and histories
#[derive(Debug, Clone)]
pub struct PriceTracker {
    window: usize,
    ranges: HashMap<String, PriceRange>,
    histories: HashMap<String, PriceHistory>,
}

impl PriceTracker {
    /// Create a tracker keeping `window` recent prices per symbol
    pub fn new(window: usize) -> Self {
        Self {
            window,
            ranges: HashMap::new(),
            histories: HashMap::new(),
        }
    }

    /// Fold a new price into the symbol's range and history
    pub fn observe(&mut self, symbol: &str, price: Decimal) -> Observation {
        let range = self.ranges.entry(symbol.to_string()).or_default();
        let prior_range = *range;
        range.observe(price);
        let range = *range;

        let window = self.window;
        let history = self
            .histories
            .entry(symbol.to_string())
            .or_insert_with(|| PriceHistory::new(window));
        history.push(price);

        Observation {
            price,
            prior_range,
            range,
            previous: history.previous(),
            samples: history.len(),
        }
    }

    pub fn range(&self, symbol: &str) -> Option<PriceRange> {
        self.ranges.get(symbol).copied()
    }

    pub fn history(&self, symbol: &str) -> Option<&PriceHistory> {
        self.histories.get(symbol)
    }

    /// Forget all ranges and histories
    pub fn reset(&mut self) {
        self.ranges.clear();
        self.histories.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_price_sets_both_bounds() {
        let mut tracker = PriceTracker::new(3);
        let obs = tracker.observe("INFY", dec!(1500));

        assert!(!obs.prior_range.is_set());
        assert_eq!(obs.range.high, dec!(1500));
        assert_eq!(obs.range.low, dec!(1500));
        assert_eq!(obs.previous, None);
        assert_eq!(obs.samples, 1);
    }

    #[test]
    fn test_range_is_monotonic() {
        let mut tracker = PriceTracker::new(3);
        let prices = [dec!(100), dec!(102), dec!(99), dec!(101), dec!(98.5), dec!(103)];

        let mut last = PriceRange::default();
        for price in prices {
            let obs = tracker.observe("SBIN", price);
            if last.is_set() {
                assert!(obs.range.high >= last.high);
                assert!(obs.range.low <= last.low);
            }
            assert_eq!(obs.prior_range, last);
            last = obs.range;
        }

        assert_eq!(last.high, dec!(103));
        assert_eq!(last.low, dec!(98.5));
    }

    #[test]
    fn test_history_keeps_most_recent_window() {
        let mut tracker = PriceTracker::new(3);
        for price in [dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)] {
            tracker.observe("TCS", price);
            assert!(tracker.history("TCS").unwrap().len() <= 3);
        }

        let history: Vec<Decimal> = tracker.history("TCS").unwrap().iter().copied().collect();
        assert_eq!(history, vec![dec!(3), dec!(4), dec!(5)]);
        assert_eq!(tracker.history("TCS").unwrap().previous(), Some(dec!(4)));
        assert_eq!(tracker.history("TCS").unwrap().latest(), Some(dec!(5)));
    }

    #[test]
    fn test_symbols_are_independent() {
        let mut tracker = PriceTracker::new(3);
        tracker.observe("A", dec!(10));
        tracker.observe("B", dec!(500));
        tracker.observe("A", dec!(12));

        assert_eq!(tracker.range("A").unwrap().high, dec!(12));
        assert_eq!(tracker.range("B").unwrap().low, dec!(500));
        assert_eq!(tracker.history("B").unwrap().len(), 1);
    }

    #[test]
    fn test_replay_is_idempotent() {
        let prices = [dec!(50), dec!(51), dec!(49.5), dec!(50.2)];

        let mut a = PriceTracker::new(3);
        let mut b = PriceTracker::new(3);
        let obs_a: Vec<Observation> = prices.iter().map(|p| a.observe("X", *p)).collect();
        let obs_b: Vec<Observation> = prices.iter().map(|p| b.observe("X", *p)).collect();

        assert_eq!(obs_a, obs_b);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut tracker = PriceTracker::new(3);
        tracker.observe("X", dec!(10));
        tracker.reset();
        assert!(tracker.range("X").is_none());
        assert!(tracker.history("X").is_none());
    }
}
