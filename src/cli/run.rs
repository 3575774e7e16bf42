//! Run command implementation

use crate::config::{load_watchlist, Config, ExecutionMode};
use crate::engine::{EngineSettings, EngineState, PositionEngine};
use crate::execution::{LiveExecutor, OrderExecutor, PaperExecutor};
use crate::instrument::{InstrumentResolver, TokenCache};
use crate::ledger::TradeJournal;
use crate::scheduler::{Scheduler, SchedulerSettings, SessionClock};
use crate::strategy::{FileStrategySource, StrategyGenerator, StrategyParams, StrategyStore};
use crate::telemetry::{self, GaugeMetric};
use anyhow::Context;
use chrono::Utc;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Place real orders regardless of the configured mode
    #[arg(long)]
    pub live: bool,
}

impl RunArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if self.live {
            config.execution.mode = ExecutionMode::Live;
        }

        let gateway = super::connect(&config).await?;
        let tickers = load_watchlist(&config.paths.watchlist)?;

        let resolver = InstrumentResolver::new(
            gateway.clone(),
            TokenCache::new(&config.paths.token_cache),
            config.gateway.exchange.clone(),
            config.gateway.equity_suffix.clone(),
        )
        .with_search_delay(Duration::from_millis(config.schedule.search_delay_ms));

        let instruments = resolver.resolve(&tickers).await;
        if instruments.is_empty() {
            anyhow::bail!("No watchlist ticker could be resolved");
        }
        telemetry::set_gauge(GaugeMetric::ResolvedSymbols, instruments.len() as f64);
        tracing::info!(resolved = instruments.len(), watchlist = tickers.len(), "Instruments ready");

        // connectivity check only
        if let Some((symbol, token)) = instruments.iter().next() {
            match gateway.last_price(&config.gateway.exchange, token).await {
                Ok(price) => tracing::info!(%symbol, %price, "Price feed reachable"),
                Err(e) => tracing::warn!(%symbol, error = %e, "Startup price probe failed"),
            }
        }

        let source = FileStrategySource::new(&config.paths.strategy_config);
        let mut strategies = StrategyStore::new(StrategyParams::default());
        match strategies.reload(&source) {
            Ok(count) => {
                telemetry::set_gauge(GaugeMetric::StrategyEntries, count as f64);
                tracing::info!(count, "Strategy config loaded");
            }
            Err(e) => tracing::warn!(error = %e, "No strategy config, using defaults"),
        }

        let executor: Arc<dyn OrderExecutor> = match config.execution.mode {
            ExecutionMode::Paper => {
                tracing::info!("Paper trading: orders are simulated");
                Arc::new(PaperExecutor::new())
            }
            ExecutionMode::Live => {
                tracing::warn!("LIVE trading: orders go to the exchange");
                Arc::new(LiveExecutor::new(gateway.clone()))
            }
        };

        let journal = TradeJournal::open(&config.paths.trade_log).with_context(|| {
            format!("Failed to open trade log {}", config.paths.trade_log.display())
        })?;

        let state = Arc::new(Mutex::new(EngineState::new(
            config.engine.history_window,
            strategies,
            instruments,
        )));
        let engine = PositionEngine::new(EngineSettings::from_config(&config), executor);
        let clock = SessionClock::from_config(&config.schedule)?;

        let mut scheduler = Scheduler::new(
            SchedulerSettings::from_config(&config),
            clock,
            state,
            engine,
            gateway,
            Box::new(source),
            journal,
            Utc::now(),
        );
        if let Some(generator) = config.paths.generator.clone() {
            scheduler = scheduler.with_generator(StrategyGenerator::new(generator));
        }

        scheduler
            .run(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            })
            .await
    }
}
