//! Execution types

use crate::gateway::GatewayError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Gateway transaction type code
    pub fn code(self) -> &'static str {
        match self {
            OrderSide::Buy => "B",
            OrderSide::Sell => "S",
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    /// Market order (immediate execution)
    Market,
}

impl OrderType {
    /// Gateway price type code
    pub fn code(self) -> &'static str {
        match self {
            OrderType::Market => "MKT",
        }
    }
}

/// An order to be submitted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Exchange segment
    pub exchange: String,
    /// Ticker as it appears in the watchlist
    pub symbol: String,
    /// Resolved instrument token
    pub token: String,
    /// Buy or sell
    pub side: OrderSide,
    /// Whole shares
    pub quantity: u32,
    /// Order type
    pub order_type: OrderType,
    /// Product code
    pub product: String,
}

/// Acknowledgement of an accepted order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderAck {
    /// Gateway order number, or a generated id for paper orders
    pub order_id: String,
    /// Time the acknowledgement was received
    pub timestamp: DateTime<Utc>,
    /// Whether the order was simulated
    pub simulated: bool,
}

/// Order placement errors
#[derive(Debug, Error)]
pub enum OrderError {
    /// Gateway refused or failed the order
    #[error("order rejected: {0}")]
    Rejected(#[from] GatewayError),
    /// Quantity below one share
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_side_codes() {
        assert_eq!(OrderSide::Buy.code(), "B");
        assert_eq!(OrderSide::Sell.code(), "S");
        assert_eq!(OrderSide::Sell.to_string(), "SELL");
    }

    #[test]
    fn test_order_type_code() {
        assert_eq!(OrderType::Market.code(), "MKT");
    }

    #[test]
    fn test_order_error_from_gateway() {
        let err: OrderError = GatewayError::NoSession.into();
        assert!(err.to_string().contains("no session token"));
    }
}
