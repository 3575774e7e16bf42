//! Paper trading executor

use super::{OrderAck, OrderError, OrderExecutor, OrderRequest};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Accepts every well-formed order without touching the gateway
pub struct PaperExecutor {
    orders: Arc<RwLock<Vec<(OrderRequest, OrderAck)>>>,
}

impl PaperExecutor {
    /// Create a new paper executor
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(vec![])),
        }
    }

    /// Every order accepted so far
    pub async fn orders(&self) -> Vec<(OrderRequest, OrderAck)> {
        self.orders.read().await.clone()
    }
}

impl Default for PaperExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderExecutor for PaperExecutor {
    async fn submit(&self, order: &OrderRequest) -> Result<OrderAck, OrderError> {
        if order.quantity == 0 {
            return Err(OrderError::InvalidQuantity(order.quantity));
        }

        let ack = OrderAck {
            order_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            simulated: true,
        };

        tracing::info!(
            symbol = %order.symbol,
            token = %order.token,
            side = %order.side,
            qty = order.quantity,
            order_id = %ack.order_id,
            "PAPER order filled"
        );

        self.orders.write().await.push((order.clone(), ack.clone()));
        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{OrderSide, OrderType};

    fn order(side: OrderSide, quantity: u32) -> OrderRequest {
        OrderRequest {
            exchange: "NSE".to_string(),
            symbol: "INFY".to_string(),
            token: "1594".to_string(),
            side,
            quantity,
            order_type: OrderType::Market,
            product: "C".to_string(),
        }
    }

    #[tokio::test]
    async fn test_paper_executor_fill() {
        let executor = PaperExecutor::new();

        let ack = executor.submit(&order(OrderSide::Buy, 10)).await.unwrap();
        let orders = executor.orders().await;

        assert!(ack.simulated);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].1.order_id, ack.order_id);
        assert_eq!(orders[0].0.quantity, 10);
    }

    #[tokio::test]
    async fn test_paper_executor_multiple_orders() {
        let executor = PaperExecutor::new();

        executor.submit(&order(OrderSide::Buy, 5)).await.unwrap();
        executor.submit(&order(OrderSide::Sell, 5)).await.unwrap();

        let orders = executor.orders().await;
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].0.side, OrderSide::Buy);
        assert_eq!(orders[1].0.side, OrderSide::Sell);
        assert_ne!(orders[0].1.order_id, orders[1].1.order_id);
    }

    #[tokio::test]
    async fn test_paper_executor_rejects_zero_quantity() {
        let executor = PaperExecutor::new();
        let result = executor.submit(&order(OrderSide::Buy, 0)).await;
        assert!(matches!(result, Err(OrderError::InvalidQuantity(0))));
        assert!(executor.orders().await.is_empty());
    }
}
