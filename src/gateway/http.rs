//! HTTP transport for the brokerage REST API
//!
//! The token endpoint takes a JSON body. Trading endpoints take a form body
//! of the shape `jData=<json>&jKey=<token>`, with the account fields injected
//! into every payload.

use super::types::{Endpoint, GatewayError, TokenRequest};
use super::{Payload, Transport};
use crate::config::GatewayConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// reqwest-backed [`Transport`]
pub struct HttpTransport {
    client: Client,
    auth_url: String,
    base_url: String,
    user_id: String,
}

impl HttpTransport {
    /// Create a transport for the configured endpoints
    pub fn new(config: &GatewayConfig, user_id: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            auth_url: config.auth_url.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_id: user_id.into(),
        }
    }

    /// Encode a payload as the gateway's form body
    pub fn form_body(&self, payload: &Payload, token: &str) -> Result<String, GatewayError> {
        let mut fields = payload.clone();
        fields.insert("uid".to_string(), self.user_id.clone());
        fields.insert("actid".to_string(), self.user_id.clone());
        fields.insert("source".to_string(), "API".to_string());

        let json = serde_json::to_string(&fields).map_err(|e| GatewayError::Decode {
            operation: "encode",
            reason: e.to_string(),
            raw: String::new(),
        })?;

        Ok(format!("jData={}&jKey={}", json, token))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request_token(&self, request: &TokenRequest) -> Result<String, GatewayError> {
        tracing::debug!(url = %self.auth_url, "Requesting session token");

        let response = self
            .client
            .post(&self.auth_url)
            .json(request)
            .send()
            .await?;

        Ok(response.text().await?)
    }

    async fn post(
        &self,
        endpoint: Endpoint,
        payload: &Payload,
        token: &str,
    ) -> Result<String, GatewayError> {
        let url = format!("{}{}", self.base_url, endpoint.path());
        let body = self.form_body(payload, token)?;

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::debug!(%status, endpoint = endpoint.path(), "Non-2xx gateway response");
        }
        Ok(text)
    }
}
