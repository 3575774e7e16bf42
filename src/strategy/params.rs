//! Strategy parameters

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Per-symbol trading thresholds
///
/// Field names on the wire follow the generator's output
/// (`breakout_long`, `breakout_short`, `target`, `sl`). Missing fields take
/// the process defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Generator's classification label (A, B, C)
    pub class: String,
    /// Short entries permitted
    pub allow_short: bool,
    /// Margin above the session high that qualifies a breakout
    #[serde(rename = "breakout_long")]
    pub breakout_buffer: Decimal,
    /// Margin below the session low that qualifies a breakdown
    #[serde(rename = "breakout_short")]
    pub breakdown_buffer: Decimal,
    /// Profit target as a fraction of entry
    #[serde(rename = "target")]
    pub target_pct: Decimal,
    /// Fixed stop-loss as a fraction of entry
    #[serde(rename = "sl")]
    pub stop_loss_pct: Decimal,
    /// Budget multiplier for sizing
    pub leverage: Decimal,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            class: "B".to_string(),
            allow_short: true,
            breakout_buffer: dec!(0.002),
            breakdown_buffer: dec!(0.002),
            target_pct: dec!(0.02),
            stop_loss_pct: dec!(0.01),
            leverage: dec!(1.0),
        }
    }
}
