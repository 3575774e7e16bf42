//! Gateway wire types and errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status literal the gateway uses for success
pub const STAT_OK: &str = "Ok";

/// Gateway and session errors
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request code is empty; nothing was sent
    #[error("request code missing, fetch a fresh one for today's session")]
    MissingRequestCode,
    /// Token endpoint rejected the handshake
    #[error("authentication rejected: stat={status} emsg={message} raw={raw}")]
    Auth {
        status: String,
        message: String,
        raw: String,
    },
    /// No cached session token
    #[error("no session token, authenticate first")]
    NoSession,
    /// Re-authentication after an invalidated session failed
    #[error("re-authentication failed: {0}")]
    ReAuth(#[source] Box<GatewayError>),
    /// Network, timeout or HTTP-level failure
    #[error("transport error: {0}")]
    Transport(String),
    /// Gateway answered with a non-"Ok" status
    #[error("{operation} failed: stat={status} emsg={message} raw={raw}")]
    Business {
        operation: &'static str,
        status: String,
        message: String,
        raw: String,
    },
    /// Response body did not have the expected shape
    #[error("malformed {operation} response: {reason} raw={raw}")]
    Decode {
        operation: &'static str,
        reason: String,
        raw: String,
    },
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.to_string())
    }
}

/// Trading API endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SearchScrip,
    GetQuotes,
    PlaceOrder,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::SearchScrip => "/SearchScrip",
            Endpoint::GetQuotes => "/GetQuotes",
            Endpoint::PlaceOrder => "/PlaceOrder",
        }
    }
}

/// Body posted to the token endpoint
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest {
    pub api_key: String,
    pub request_code: String,
    /// Hex SHA-256 of api key + request code + api secret
    pub api_secret: String,
}

/// Token endpoint response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub stat: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub emsg: String,
}

/// Instrument search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub stat: String,
    #[serde(default)]
    pub emsg: String,
    #[serde(default)]
    pub values: Vec<ScripCandidate>,
}

/// One instrument returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScripCandidate {
    /// Trading symbol, e.g. `INFY-EQ`
    pub tsym: String,
    /// Gateway-internal instrument token
    pub token: String,
}

/// Quote response; the price arrives as a string in `lp`, sometimes `ltp`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteResponse {
    #[serde(default)]
    pub stat: String,
    #[serde(default)]
    pub emsg: String,
    #[serde(default)]
    pub lp: Option<String>,
    #[serde(default)]
    pub ltp: Option<String>,
}

impl QuoteResponse {
    /// Last price field, preferring `lp`
    pub fn price_field(&self) -> Option<&str> {
        self.lp
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.ltp.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Order placement response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub stat: String,
    #[serde(default)]
    pub emsg: String,
    #[serde(default)]
    pub norenordno: String,
}
