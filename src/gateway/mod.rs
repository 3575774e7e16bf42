//! Brokerage gateway module
//!
//! Three layers, leaves first:
//! - [`Transport`]: raw request/response bodies (HTTP in production)
//! - [`SessionManager`]: owns the session token, performs the hashed-credential
//!   handshake and transparently re-authenticates once on an invalidated session
//! - [`GatewayClient`]: typed [`MarketGateway`] operations over a session

mod client;
mod http;
mod session;
mod types;

pub use client::GatewayClient;
pub use http::HttpTransport;
pub use session::{is_session_invalid, security_key, SessionManager, INVALIDATION_MARKERS};
pub use types::{
    Endpoint, GatewayError, OrderResponse, QuoteResponse, ScripCandidate, SearchResponse,
    TokenRequest, TokenResponse, STAT_OK,
};

use crate::execution::OrderRequest;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Request fields for a trading endpoint; the gateway takes string values only
pub type Payload = BTreeMap<String, String>;

/// Raw access to the gateway endpoints
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submit the handshake to the token endpoint and return the raw body
    async fn request_token(&self, request: &TokenRequest) -> Result<String, GatewayError>;
    /// Post a payload to a trading endpoint under `token`, returning the raw body
    async fn post(
        &self,
        endpoint: Endpoint,
        payload: &Payload,
        token: &str,
    ) -> Result<String, GatewayError>;
}

/// Market operations the engine needs from the brokerage
#[async_trait]
pub trait MarketGateway: Send + Sync {
    /// Search instruments on `exchange` matching `text`
    async fn search_instrument(
        &self,
        exchange: &str,
        text: &str,
    ) -> Result<Vec<ScripCandidate>, GatewayError>;
    /// Last traded price for an instrument token
    async fn last_price(&self, exchange: &str, token: &str) -> Result<Decimal, GatewayError>;
    /// Place an order, returning the gateway order id
    async fn place_order(&self, order: &OrderRequest) -> Result<String, GatewayError>;
}
