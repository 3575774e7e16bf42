//! Typed gateway operations

use super::session::SessionManager;
use super::types::{
    Endpoint, GatewayError, OrderResponse, QuoteResponse, ScripCandidate, SearchResponse, STAT_OK,
};
use super::{MarketGateway, Payload};
use crate::execution::OrderRequest;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::sync::Arc;

/// [`MarketGateway`] over an authenticated session
pub struct GatewayClient {
    session: Arc<SessionManager>,
    equity_suffix: String,
}

impl GatewayClient {
    /// Create a client; `equity_suffix` is appended to tickers when ordering
    pub fn new(session: Arc<SessionManager>, equity_suffix: impl Into<String>) -> Self {
        Self {
            session,
            equity_suffix: equity_suffix.into(),
        }
    }
}

fn decode<T: DeserializeOwned>(operation: &'static str, raw: &str) -> Result<T, GatewayError> {
    serde_json::from_str(raw).map_err(|e| GatewayError::Decode {
        operation,
        reason: e.to_string(),
        raw: raw.to_string(),
    })
}

fn fields<const N: usize>(pairs: [(&str, String); N]) -> Payload {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[async_trait]
impl MarketGateway for GatewayClient {
    async fn search_instrument(
        &self,
        exchange: &str,
        text: &str,
    ) -> Result<Vec<ScripCandidate>, GatewayError> {
        let payload = fields([("exch", exchange.to_string()), ("stext", text.to_string())]);
        let raw = self.session.request(Endpoint::SearchScrip, &payload).await?;
        let response: SearchResponse = decode("SearchScrip", &raw)?;

        if response.stat != STAT_OK {
            return Err(GatewayError::Business {
                operation: "SearchScrip",
                status: response.stat,
                message: response.emsg,
                raw,
            });
        }
        Ok(response.values)
    }

    async fn last_price(&self, exchange: &str, token: &str) -> Result<Decimal, GatewayError> {
        let payload = fields([("exch", exchange.to_string()), ("token", token.to_string())]);
        let raw = self.session.request(Endpoint::GetQuotes, &payload).await?;
        let response: QuoteResponse = decode("GetQuotes", &raw)?;

        if response.stat != STAT_OK {
            return Err(GatewayError::Business {
                operation: "GetQuotes",
                status: response.stat,
                message: response.emsg,
                raw,
            });
        }

        let field = response.price_field().ok_or_else(|| GatewayError::Decode {
            operation: "GetQuotes",
            reason: "no price field".to_string(),
            raw: raw.clone(),
        })?;

        Decimal::from_str(field).map_err(|e| GatewayError::Decode {
            operation: "GetQuotes",
            reason: format!("price {:?}: {}", field, e),
            raw: raw.clone(),
        })
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<String, GatewayError> {
        let payload = fields([
            ("exch", order.exchange.clone()),
            ("tsym", format!("{}{}", order.symbol, self.equity_suffix)),
            ("qty", order.quantity.to_string()),
            ("prc", "0".to_string()),
            ("prd", order.product.clone()),
            ("trgprc", "0".to_string()),
            ("prctyp", order.order_type.code().to_string()),
            ("ret", "DAY".to_string()),
            ("trantype", order.side.code().to_string()),
        ]);

        let raw = self.session.request(Endpoint::PlaceOrder, &payload).await?;
        let response: OrderResponse = decode("PlaceOrder", &raw)?;

        if response.stat != STAT_OK {
            return Err(GatewayError::Business {
                operation: "PlaceOrder",
                status: response.stat,
                message: response.emsg,
                raw,
            });
        }

        tracing::info!(
            symbol = %order.symbol,
            order_id = %response.norenordno,
            "Order placed"
        );
        Ok(response.norenordno)
    }
}
