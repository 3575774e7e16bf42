//! Scheduler tick loop

use super::SessionClock;
use crate::config::Config;
use crate::engine::{EngineState, EntryTrigger, Position, PositionEngine};
use crate::gateway::MarketGateway;
use crate::ledger::{DailySummary, TradeJournal, TradeRecord};
use crate::strategy::{StrategyGenerator, StrategySource};
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

/// Scheduler settings
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub exchange: String,
    pub poll_interval: Duration,
    pub reload_interval: TimeDelta,
    pub inter_symbol_delay: Duration,
    /// Resolved but never polled
    pub excluded_symbols: HashSet<String>,
    pub block_entries_after_square_off: bool,
}

impl SchedulerSettings {
    pub fn from_config(config: &Config) -> Self {
        let schedule = &config.schedule;
        Self {
            exchange: config.gateway.exchange.clone(),
            poll_interval: Duration::from_secs(schedule.poll_interval_secs),
            reload_interval: TimeDelta::seconds(schedule.reload_interval_secs as i64),
            inter_symbol_delay: Duration::from_millis(schedule.inter_symbol_delay_ms),
            excluded_symbols: schedule.excluded_symbols.iter().cloned().collect(),
            block_entries_after_square_off: config.engine.block_entries_after_square_off,
        }
    }
}

/// What one tick did
#[derive(Debug, Default)]
pub struct TickReport {
    pub summary: Option<DailySummary>,
    pub squared_off: Vec<TradeRecord>,
    pub reloaded: bool,
    /// Symbols whose price was fetched and evaluated
    pub polled: usize,
    pub fetch_failures: usize,
    pub entries: Vec<(EntryTrigger, Position)>,
    pub exits: Vec<TradeRecord>,
}

/// Drives the engine on a fixed cadence
pub struct Scheduler {
    settings: SchedulerSettings,
    clock: SessionClock,
    state: Arc<Mutex<EngineState>>,
    engine: PositionEngine,
    gateway: Arc<dyn MarketGateway>,
    strategies: Box<dyn StrategySource>,
    generator: Option<StrategyGenerator>,
    journal: TradeJournal,
    last_reload: DateTime<Utc>,
    last_summary: Option<NaiveDate>,
}

impl Scheduler {
    /// Create a scheduler; the reload cadence counts from `started_at`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: SchedulerSettings,
        clock: SessionClock,
        state: Arc<Mutex<EngineState>>,
        engine: PositionEngine,
        gateway: Arc<dyn MarketGateway>,
        strategies: Box<dyn StrategySource>,
        journal: TradeJournal,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            settings,
            clock,
            state,
            engine,
            gateway,
            strategies,
            generator: None,
            journal,
            last_reload: started_at,
            last_summary: None,
        }
    }

    /// Run the generator before every scheduled reload
    pub fn with_generator(mut self, generator: StrategyGenerator) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn state(&self) -> Arc<Mutex<EngineState>> {
        self.state.clone()
    }

    /// Tick until `shutdown` resolves
    ///
    /// Shutdown is observed between ticks; a tick in progress always
    /// completes so no order is left unrecorded.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        let mut interval = tokio::time::interval(self.settings.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(
            interval_secs = self.settings.poll_interval.as_secs(),
            "Scheduler started"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested, stopping scheduler");
                    break;
                }
                _ = interval.tick() => {
                    let report = self.tick(Utc::now()).await?;
                    tracing::debug!(
                        polled = report.polled,
                        failures = report.fetch_failures,
                        entries = report.entries.len(),
                        exits = report.exits.len(),
                        "Tick finished"
                    );
                }
            }
        }

        let state = self.state.lock().await;
        if !state.positions.is_empty() {
            tracing::warn!(open = state.positions.total(), "Stopping with open positions");
        }
        Ok(())
    }

    /// Run one tick at `now`
    ///
    /// Only trade-log write failures are errors; everything else is logged
    /// and retried on a later tick.
    pub async fn tick(&mut self, now: DateTime<Utc>) -> anyhow::Result<TickReport> {
        let started = Instant::now();
        let mut report = TickReport::default();

        if self.clock.summary_due(now, self.last_summary) {
            report.summary = Some(self.write_summary(now).await?);
        }

        let past_square_off = self.clock.is_square_off(now);
        if past_square_off {
            report.squared_off = self.square_off_all(now).await?;
        }

        if now - self.last_reload >= self.settings.reload_interval {
            report.reloaded = self.reload_strategies().await;
            self.last_reload = now;
        }

        let entries_allowed = !(past_square_off && self.settings.block_entries_after_square_off);
        self.poll_symbols(now, entries_allowed, &mut report).await?;

        {
            let state = self.state.lock().await;
            telemetry::set_gauge(GaugeMetric::OpenPositions, state.positions.total() as f64);
            telemetry::set_gauge(
                GaugeMetric::DailyPnl,
                state.ledger.daily_pnl().to_f64().unwrap_or_default(),
            );
        }
        telemetry::record_tick_duration(started.elapsed());

        Ok(report)
    }

    async fn write_summary(&mut self, now: DateTime<Utc>) -> anyhow::Result<DailySummary> {
        let date = self.clock.today(now);
        let summary = {
            let mut state = self.state.lock().await;
            state.prices.reset();
            state.ledger.close_day(date)
        };

        let at = self.clock.local_naive(now);
        for line in summary.lines() {
            self.journal
                .append(at, &line)
                .with_context(|| format!("writing {}", self.journal.path().display()))?;
        }

        tracing::info!(
            %date,
            trades = summary.trade_count,
            net_pnl = %summary.net_pnl,
            long_pnl = %summary.long_pnl,
            short_pnl = %summary.short_pnl,
            "Daily summary"
        );
        self.last_summary = Some(date);
        Ok(summary)
    }

    async fn square_off_all(&mut self, now: DateTime<Utc>) -> anyhow::Result<Vec<TradeRecord>> {
        let open: Vec<(String, String)> = {
            let state = self.state.lock().await;
            let symbols: BTreeSet<&String> = state.positions.iter().map(|p| &p.symbol).collect();
            symbols
                .into_iter()
                .map(|s| {
                    let token = state.instruments.get(s).cloned().unwrap_or_default();
                    (s.clone(), token)
                })
                .collect()
        };
        if open.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!(symbols = open.len(), "Square-off time reached, closing positions");
        let mut closed = Vec::new();

        for (symbol, token) in open {
            let Some(price) = self.fetch_price(&symbol, &token).await else {
                continue;
            };
            let trades = {
                let mut state = self.state.lock().await;
                self.engine.square_off(&mut state, &symbol, price, now).await
            };
            self.journal_exits(now, &trades)?;
            closed.extend(trades);
        }

        Ok(closed)
    }

    async fn reload_strategies(&mut self) -> bool {
        if let Some(generator) = &self.generator {
            if let Err(e) = generator.run().await {
                tracing::warn!(error = %e, "Strategy generation failed, keeping current config");
                return false;
            }
        }

        let mut state = self.state.lock().await;
        match state.strategies.reload(self.strategies.as_ref()) {
            Ok(count) => {
                telemetry::set_gauge(GaugeMetric::StrategyEntries, count as f64);
                tracing::info!(count, "Strategy config reloaded");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Strategy reload failed, keeping current config");
                false
            }
        }
    }

    async fn poll_symbols(
        &mut self,
        now: DateTime<Utc>,
        entries_allowed: bool,
        report: &mut TickReport,
    ) -> anyhow::Result<()> {
        let instruments: Vec<(String, String)> = {
            let state = self.state.lock().await;
            state
                .instruments
                .iter()
                .filter(|(symbol, _)| !self.settings.excluded_symbols.contains(*symbol))
                .map(|(symbol, token)| (symbol.clone(), token.clone()))
                .collect()
        };

        for (i, (symbol, token)) in instruments.iter().enumerate() {
            if i > 0 && !self.settings.inter_symbol_delay.is_zero() {
                tokio::time::sleep(self.settings.inter_symbol_delay).await;
            }

            let Some(price) = self.fetch_price(symbol, token).await else {
                report.fetch_failures += 1;
                continue;
            };

            let cycle = {
                let mut state = self.state.lock().await;
                self.engine
                    .on_price(&mut state, symbol, price, now, entries_allowed)
                    .await
            };
            report.polled += 1;

            let at = self.clock.local_naive(now);
            for (trigger, position) in &cycle.entries {
                let line = format!(
                    "ENTRY {} {} @ {:.2} Qty: {} Trigger: {}",
                    position.direction, position.symbol, position.entry_price, position.quantity, trigger
                );
                self.journal
                    .append(at, &line)
                    .with_context(|| format!("writing {}", self.journal.path().display()))?;
            }
            self.journal_exits(now, &cycle.exits)?;

            report.entries.extend(cycle.entries);
            report.exits.extend(cycle.exits);
        }

        Ok(())
    }

    /// Fetch a usable price; failures are logged and skipped for this tick
    async fn fetch_price(&self, symbol: &str, token: &str) -> Option<Decimal> {
        match self.gateway.last_price(&self.settings.exchange, token).await {
            Ok(price) if price > Decimal::ZERO => Some(price),
            Ok(price) => {
                tracing::warn!(symbol, %price, "Non-positive price, skipping");
                None
            }
            Err(e) => {
                telemetry::increment(CounterMetric::PriceFetchFailures);
                tracing::warn!(symbol, error = %e, "Price fetch failed, skipping");
                None
            }
        }
    }

    fn journal_exits(&mut self, now: DateTime<Utc>, trades: &[TradeRecord]) -> anyhow::Result<()> {
        let at = self.clock.local_naive(now);
        for trade in trades {
            self.journal
                .append(at, &trade.to_string())
                .with_context(|| format!("writing {}", self.journal.path().display()))?;
        }
        Ok(())
    }
}
