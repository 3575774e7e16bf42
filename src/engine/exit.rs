//! Exit rules

use super::{Direction, Position};
use crate::strategy::StrategyParams;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    /// Price crossed the fixed stop (fraction of entry)
    FixedStopLoss { pct: Decimal },
    /// Price reached the profit target (fraction of entry)
    Target { pct: Decimal },
    /// Price gave back the trailing distance from its best level
    TrailingStop,
    /// End-of-day forced close
    SquareOff,
}

impl std::fmt::Display for ExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitReason::FixedStopLoss { pct } => write!(f, "Fixed SL {:.1}%", pct * dec!(100)),
            ExitReason::Target { pct } => write!(f, "Target {:.1}%", pct * dec!(100)),
            ExitReason::TrailingStop => write!(f, "Trailing SL"),
            ExitReason::SquareOff => write!(f, "EOD Square-off"),
        }
    }
}

/// Evaluate the exit rules for one price
///
/// The extreme price is updated first. Rules are checked in order: fixed
/// stop, target, trailing stop; the first hit wins.
pub fn evaluate_exit(
    position: &mut Position,
    price: Decimal,
    params: &StrategyParams,
    trailing_pct: Decimal,
) -> Option<ExitReason> {
    position.update_extreme(price);

    let entry = position.entry_price;
    let extreme = position.extreme_price;
    let sl = params.stop_loss_pct;
    let target = params.target_pct;

    let (stop_hit, target_hit, trail_hit) = match position.direction {
        Direction::Long => (
            price <= entry * (Decimal::ONE - sl),
            price >= entry * (Decimal::ONE + target),
            price <= extreme * (Decimal::ONE - trailing_pct),
        ),
        Direction::Short => (
            price >= entry * (Decimal::ONE + sl),
            price <= entry * (Decimal::ONE - target),
            price >= extreme * (Decimal::ONE + trailing_pct),
        ),
    };

    if stop_hit {
        Some(ExitReason::FixedStopLoss { pct: sl })
    } else if target_hit {
        Some(ExitReason::Target { pct: target })
    } else if trail_hit {
        Some(ExitReason::TrailingStop)
    } else {
        None
    }
}
