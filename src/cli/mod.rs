//! CLI interface for intraday-engine
//!
//! Provides subcommands for:
//! - `run`: Start the trading loop (paper unless `--live`)
//! - `resolve`: Resolve the watchlist to instrument tokens
//! - `config`: Show the effective configuration

mod resolve;
mod run;

pub use resolve::ResolveArgs;
pub use run::RunArgs;

use crate::config::{Config, Credentials};
use crate::gateway::{GatewayClient, HttpTransport, MarketGateway, SessionManager};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "intraday-engine")]
#[command(about = "Intraday equity trading agent with breakout entries and trailing exits")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the trading loop
    Run(RunArgs),
    /// Resolve watchlist tickers to instrument tokens
    Resolve(ResolveArgs),
    /// Show the effective configuration
    Config,
}

/// Authenticate against the gateway with credentials from the environment
async fn connect(config: &Config) -> anyhow::Result<Arc<dyn MarketGateway>> {
    let credentials = Credentials::from_env()?;
    let transport = Arc::new(HttpTransport::new(&config.gateway, credentials.user_id.clone()));
    let session = Arc::new(SessionManager::new(transport, credentials));

    session
        .authenticate()
        .await
        .context("Gateway authentication failed")?;

    Ok(Arc::new(GatewayClient::new(
        session,
        config.gateway.equity_suffix.clone(),
    )))
}
