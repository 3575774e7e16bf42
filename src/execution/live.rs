//! Live executor: forwards orders to the brokerage

use super::{OrderAck, OrderError, OrderExecutor, OrderRequest};
use crate::gateway::MarketGateway;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Places real orders through a [`MarketGateway`]
pub struct LiveExecutor {
    gateway: Arc<dyn MarketGateway>,
}

impl LiveExecutor {
    pub fn new(gateway: Arc<dyn MarketGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl OrderExecutor for LiveExecutor {
    async fn submit(&self, order: &OrderRequest) -> Result<OrderAck, OrderError> {
        if order.quantity == 0 {
            return Err(OrderError::InvalidQuantity(order.quantity));
        }

        let order_id = self.gateway.place_order(order).await?;
        Ok(OrderAck {
            order_id,
            timestamp: Utc::now(),
            simulated: false,
        })
    }
}
