//! Execution module
//!
//! Order placement behind one capability, selected once at startup: a paper
//! executor that only logs, or a live executor that calls the gateway.

mod live;
mod paper;
mod types;

pub use live::LiveExecutor;
pub use paper::PaperExecutor;
pub use types::{OrderAck, OrderError, OrderRequest, OrderSide, OrderType};

use async_trait::async_trait;

/// Trait for order execution implementations
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    /// Submit an order; `Ok` means the order was accepted
    async fn submit(&self, order: &OrderRequest) -> Result<OrderAck, OrderError>;
}
