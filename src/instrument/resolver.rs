//! Ticker → instrument token resolution

use super::TokenCache;
use crate::gateway::MarketGateway;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Ticker → gateway instrument token
pub type TokenMap = BTreeMap<String, String>;

/// Resolves tickers through the cache, falling back to gateway searches
pub struct InstrumentResolver {
    gateway: Arc<dyn MarketGateway>,
    cache: TokenCache,
    exchange: String,
    equity_suffix: String,
    search_delay: Duration,
}

impl InstrumentResolver {
    pub fn new(
        gateway: Arc<dyn MarketGateway>,
        cache: TokenCache,
        exchange: impl Into<String>,
        equity_suffix: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            cache,
            exchange: exchange.into(),
            equity_suffix: equity_suffix.into(),
            search_delay: Duration::ZERO,
        }
    }

    /// Pause between searches to stay under the gateway rate limit
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    /// Resolve every ticker
    ///
    /// Uses the cache when its size matches `tickers`. Otherwise searches
    /// each ticker, keeping the first candidate whose trading symbol ends
    /// with the equity suffix. Unresolved tickers are logged and left out.
    /// The result is persisted even when partial.
    pub async fn resolve(&self, tickers: &[String]) -> TokenMap {
        if let Some(map) = self.cache.load_valid(tickers.len()) {
            tracing::info!(count = map.len(), "Loaded instrument tokens from cache");
            return map;
        }

        tracing::info!(count = tickers.len(), "Resolving instrument tokens");
        let mut map = TokenMap::new();

        for (i, ticker) in tickers.iter().enumerate() {
            if i > 0 && !self.search_delay.is_zero() {
                tokio::time::sleep(self.search_delay).await;
            }

            let text = format!("{}{}", ticker, self.equity_suffix);
            match self.gateway.search_instrument(&self.exchange, &text).await {
                Ok(candidates) => {
                    match candidates
                        .into_iter()
                        .find(|c| c.tsym.ends_with(&self.equity_suffix))
                    {
                        Some(candidate) => {
                            tracing::debug!(%ticker, token = %candidate.token, "Mapped instrument");
                            map.insert(ticker.clone(), candidate.token);
                        }
                        None => {
                            tracing::warn!(%ticker, suffix = %self.equity_suffix, "No equity instrument found");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(%ticker, error = %e, "Instrument search failed");
                }
            }
        }

        if let Err(e) = self.cache.save(&map) {
            tracing::warn!(path = %self.cache.path().display(), error = %e, "Failed to persist token cache");
        }

        tracing::info!(
            resolved = map.len(),
            requested = tickers.len(),
            "Instrument resolution complete"
        );
        map
    }
}
