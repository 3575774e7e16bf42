//! Entry detectors
//!
//! Each detector is a pure predicate over one price observation. Detectors
//! compare against the session range as it stood before the current price was
//! folded in; otherwise a new high could never exceed itself.

use super::Direction;
use crate::price::Observation;
use crate::strategy::StrategyParams;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How close to the session low the previous price must be for a bounce
const BOUNCE_LOW_PROXIMITY: Decimal = dec!(1.005);

/// What fired an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryTrigger {
    Breakout,
    BounceBack,
    Breakdown,
    QuickDrop,
}

impl EntryTrigger {
    pub fn direction(self) -> Direction {
        match self {
            EntryTrigger::Breakout | EntryTrigger::BounceBack => Direction::Long,
            EntryTrigger::Breakdown | EntryTrigger::QuickDrop => Direction::Short,
        }
    }
}

impl std::fmt::Display for EntryTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntryTrigger::Breakout => "Breakout",
            EntryTrigger::BounceBack => "Bounce-back",
            EntryTrigger::Breakdown => "Breakdown",
            EntryTrigger::QuickDrop => "Quick-drop",
        };
        f.write_str(name)
    }
}

/// Engine-wide detector thresholds
#[derive(Debug, Clone, Copy)]
pub struct EntryThresholds {
    pub bounce_rebound_pct: Decimal,
    pub quick_drop_pct: Decimal,
}

impl Default for EntryThresholds {
    fn default() -> Self {
        Self {
            bounce_rebound_pct: dec!(0.008),
            quick_drop_pct: dec!(0.012),
        }
    }
}

/// Price above the prior session high by more than `buffer`
pub fn is_breakout(obs: &Observation, buffer: Decimal) -> bool {
    let high = obs.prior_range.high;
    !high.is_zero() && obs.price > high * (Decimal::ONE + buffer)
}

/// Price below the prior session low by more than `buffer`
pub fn is_breakdown(obs: &Observation, buffer: Decimal) -> bool {
    let low = obs.prior_range.low;
    !low.is_zero() && obs.price < low * (Decimal::ONE - buffer)
}

/// Previous price sat near the session low and the current price rebounded
pub fn is_bounce_back(obs: &Observation, rebound_pct: Decimal) -> bool {
    let Some(previous) = obs.previous else {
        return false;
    };
    previous <= obs.prior_range.low * BOUNCE_LOW_PROXIMITY
        && obs.price >= previous * (Decimal::ONE + rebound_pct)
}

/// Fall from the previous price of at least `drop_pct`
pub fn is_quick_drop(obs: &Observation, drop_pct: Decimal) -> bool {
    let Some(previous) = obs.previous else {
        return false;
    };
    if previous.is_zero() {
        return false;
    }
    (previous - obs.price) / previous >= drop_pct
}

/// Triggers that fire for this observation, in evaluation order
///
/// Short triggers are suppressed when the symbol is not shortable.
pub fn detect_entries(
    obs: &Observation,
    params: &StrategyParams,
    thresholds: &EntryThresholds,
) -> Vec<EntryTrigger> {
    let mut triggers = Vec::new();

    if is_breakout(obs, params.breakout_buffer) {
        triggers.push(EntryTrigger::Breakout);
    }
    if is_bounce_back(obs, thresholds.bounce_rebound_pct) {
        triggers.push(EntryTrigger::BounceBack);
    }
    if params.allow_short {
        if is_breakdown(obs, params.breakdown_buffer) {
            triggers.push(EntryTrigger::Breakdown);
        }
        if is_quick_drop(obs, thresholds.quick_drop_pct) {
            triggers.push(EntryTrigger::QuickDrop);
        }
    }

    triggers
}

/// Whole shares affordable with `leverage × budget` at `price`, rounded down
pub fn position_size(leverage: Decimal, budget: Decimal, price: Decimal) -> u32 {
    if price <= Decimal::ZERO {
        return 0;
    }
    (leverage * budget / price)
        .floor()
        .to_u32()
        .unwrap_or(0)
}
