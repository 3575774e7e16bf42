//! Session management
//!
//! The gateway invalidates tokens without warning (daily expiry, logins from
//! another device). Rather than tracking expiry, every response is scanned for
//! known invalidation wording; a match triggers one re-authentication and one
//! retry of the original call. There is no backoff loop.

use super::types::{Endpoint, GatewayError, TokenRequest, TokenResponse, STAT_OK};
use super::{Payload, Transport};
use crate::config::Credentials;
use crate::telemetry::{self, CounterMetric};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Response fragments that mean the session token is no longer valid
///
/// Matching is case-insensitive. A change in gateway wording silently
/// defeats this check; the call then surfaces as an ordinary business error.
pub const INVALIDATION_MARKERS: [&str; 4] = [
    "session expired",
    "invalid session",
    "invalid user id",
    "not_ok",
];

/// Whether a raw response body carries a session-invalidation marker
pub fn is_session_invalid(body: &str) -> bool {
    let normalized = body.to_lowercase();
    INVALIDATION_MARKERS
        .iter()
        .any(|marker| normalized.contains(marker))
}

/// Hex SHA-256 over api key, request code and api secret, concatenated
pub fn security_key(api_key: &str, request_code: &str, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hasher.update(request_code.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Owns the session token and wraps every outbound call
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    token: RwLock<String>,
}

impl SessionManager {
    /// Create a manager with no session yet
    pub fn new(transport: Arc<dyn Transport>, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            token: RwLock::new(String::new()),
        }
    }

    /// Perform the handshake with explicit credentials and return the token
    ///
    /// Fails fast without a network call when `request_code` is empty.
    pub async fn handshake(
        transport: &dyn Transport,
        api_key: &str,
        request_code: &str,
        api_secret: &str,
    ) -> Result<String, GatewayError> {
        if request_code.is_empty() {
            return Err(GatewayError::MissingRequestCode);
        }

        let request = TokenRequest {
            api_key: api_key.to_string(),
            request_code: request_code.to_string(),
            api_secret: security_key(api_key, request_code, api_secret),
        };

        let raw = transport.request_token(&request).await?;
        let response: TokenResponse =
            serde_json::from_str(&raw).map_err(|e| GatewayError::Decode {
                operation: "apitoken",
                reason: e.to_string(),
                raw: raw.clone(),
            })?;

        if response.stat == STAT_OK && !response.token.is_empty() {
            return Ok(response.token);
        }

        Err(GatewayError::Auth {
            status: response.stat,
            message: response.emsg,
            raw,
        })
    }

    /// Authenticate with the configured credentials and cache the token
    pub async fn authenticate(&self) -> Result<(), GatewayError> {
        let token = Self::handshake(
            self.transport.as_ref(),
            &self.credentials.api_key,
            &self.credentials.request_code,
            &self.credentials.api_secret,
        )
        .await?;

        self.set_token(token).await;
        tracing::info!(user = %self.credentials.user_id, "Session established");
        Ok(())
    }

    /// Replace the cached token
    pub async fn set_token(&self, token: String) {
        *self.token.write().await = token;
    }

    /// Current token, or `NoSession` when none is cached
    pub async fn token(&self) -> Result<String, GatewayError> {
        let token = self.token.read().await;
        if token.is_empty() {
            return Err(GatewayError::NoSession);
        }
        Ok(token.clone())
    }

    /// Send a request under the current session
    ///
    /// If the response body signals an invalidated session, re-authenticates
    /// once and retries once with the fresh token. The retried body is returned
    /// as-is even if it carries a marker again.
    pub async fn request(&self, endpoint: Endpoint, payload: &Payload) -> Result<String, GatewayError> {
        let token = self.token().await?;
        let body = self.transport.post(endpoint, payload, &token).await?;

        if !is_session_invalid(&body) {
            return Ok(body);
        }

        tracing::warn!(
            endpoint = endpoint.path(),
            "Session invalidated, re-authenticating"
        );
        telemetry::increment(CounterMetric::Reauthentications);

        if let Err(e) = self.authenticate().await {
            tracing::error!(error = %e, "Re-authentication failed");
            return Err(GatewayError::ReAuth(Box::new(e)));
        }

        let token = self.token().await?;
        self.transport.post(endpoint, payload, &token).await
    }
}
