//! Resolve command implementation

use crate::config::{load_watchlist, Config};
use crate::instrument::{InstrumentResolver, TokenCache};
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Ignore the token cache and search every ticker again
    #[arg(long)]
    pub refresh: bool,
}

impl ResolveArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let gateway = super::connect(config).await?;
        let tickers = load_watchlist(&config.paths.watchlist)?;

        let cache = TokenCache::new(&config.paths.token_cache);
        if self.refresh {
            cache.clear()?;
        }

        let resolver = InstrumentResolver::new(
            gateway,
            cache,
            config.gateway.exchange.clone(),
            config.gateway.equity_suffix.clone(),
        )
        .with_search_delay(Duration::from_millis(config.schedule.search_delay_ms));

        let map = resolver.resolve(&tickers).await;
        for (ticker, token) in &map {
            println!("{ticker}\t{token}");
        }
        println!("Resolved {}/{} tickers", map.len(), tickers.len());
        Ok(())
    }
}
