//! Shared mocks for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, TimeZone, Utc};
use intraday_engine::engine::{EngineSettings, EngineState, EntryThresholds, PositionEngine};
use intraday_engine::execution::{OrderAck, OrderError, OrderExecutor, OrderRequest, PaperExecutor};
use intraday_engine::gateway::{GatewayError, MarketGateway, ScripCandidate};
use intraday_engine::instrument::TokenMap;
use intraday_engine::ledger::TradeJournal;
use intraday_engine::scheduler::{Scheduler, SchedulerSettings, SessionClock};
use intraday_engine::strategy::{FileStrategySource, StrategyParams, StrategyStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Gateway with settable prices and canned search results
#[derive(Default)]
pub struct MockGateway {
    prices: Mutex<HashMap<String, Decimal>>,
    candidates: Mutex<HashMap<String, Vec<ScripCandidate>>>,
    pub quoted: Mutex<Vec<String>>,
    pub searches: Mutex<Vec<String>>,
    pub orders: Mutex<Vec<OrderRequest>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&self, token: &str, price: Decimal) {
        self.prices.lock().unwrap().insert(token.to_string(), price);
    }

    /// Make quotes for `token` fail until a price is set again
    pub fn fail_price(&self, token: &str) {
        self.prices.lock().unwrap().remove(token);
    }

    pub fn add_candidates(&self, text: &str, candidates: &[(&str, &str)]) {
        self.candidates.lock().unwrap().insert(
            text.to_string(),
            candidates
                .iter()
                .map(|(tsym, token)| ScripCandidate {
                    tsym: tsym.to_string(),
                    token: token.to_string(),
                })
                .collect(),
        );
    }
}

#[async_trait]
impl MarketGateway for MockGateway {
    async fn search_instrument(
        &self,
        _exchange: &str,
        text: &str,
    ) -> Result<Vec<ScripCandidate>, GatewayError> {
        self.searches.lock().unwrap().push(text.to_string());
        self.candidates
            .lock()
            .unwrap()
            .get(text)
            .cloned()
            .ok_or_else(|| GatewayError::Transport(format!("no scrip for {text}")))
    }

    async fn last_price(&self, _exchange: &str, token: &str) -> Result<Decimal, GatewayError> {
        self.quoted.lock().unwrap().push(token.to_string());
        self.prices
            .lock()
            .unwrap()
            .get(token)
            .copied()
            .ok_or_else(|| GatewayError::Transport("timeout".to_string()))
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<String, GatewayError> {
        let mut orders = self.orders.lock().unwrap();
        orders.push(order.clone());
        Ok(format!("ORD{}", orders.len()))
    }
}

/// Paper executor that can be switched to reject everything
#[derive(Default)]
pub struct SwitchableExecutor {
    pub failing: AtomicBool,
    pub inner: PaperExecutor,
}

impl SwitchableExecutor {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderExecutor for SwitchableExecutor {
    async fn submit(&self, order: &OrderRequest) -> Result<OrderAck, OrderError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(OrderError::Rejected(GatewayError::Business {
                operation: "PlaceOrder",
                status: "Not_Ok".to_string(),
                message: "RMS:Rule: Check circuit limit".to_string(),
                raw: String::new(),
            }));
        }
        self.inner.submit(order).await
    }
}

/// 2024-03-01 at `h:m` IST, as UTC
pub fn ist(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    FixedOffset::east_opt(330 * 60)
        .unwrap()
        .with_ymd_and_hms(2024, 3, 1, h, m, s)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn engine_settings(max_open_positions: usize) -> EngineSettings {
    EngineSettings {
        exchange: "NSE".to_string(),
        product: "C".to_string(),
        budget_per_trade: dec!(100000),
        max_open_positions,
        thresholds: EntryThresholds::default(),
        trailing_stop_pct: dec!(0.01),
    }
}

pub fn instruments(pairs: &[(&str, &str)]) -> TokenMap {
    pairs
        .iter()
        .map(|(s, t)| (s.to_string(), t.to_string()))
        .collect()
}

pub fn engine_state(pairs: &[(&str, &str)]) -> EngineState {
    EngineState::new(
        3,
        StrategyStore::new(StrategyParams::default()),
        instruments(pairs),
    )
}

pub fn scheduler_settings(excluded: &[&str]) -> SchedulerSettings {
    SchedulerSettings {
        exchange: "NSE".to_string(),
        poll_interval: Duration::from_secs(10),
        reload_interval: TimeDelta::minutes(15),
        inter_symbol_delay: Duration::ZERO,
        excluded_symbols: excluded.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
        block_entries_after_square_off: true,
    }
}

pub fn ist_clock() -> SessionClock {
    SessionClock::new(
        330,
        NaiveTime::from_hms_opt(15, 10, 0).unwrap(),
        NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
    )
    .unwrap()
}

/// Scheduler over a mock gateway with files under `dir`
pub fn scheduler(
    dir: &Path,
    gateway: Arc<MockGateway>,
    executor: Arc<dyn OrderExecutor>,
    pairs: &[(&str, &str)],
    settings: SchedulerSettings,
    started_at: DateTime<Utc>,
) -> Scheduler {
    let state = Arc::new(tokio::sync::Mutex::new(engine_state(pairs)));
    let engine = PositionEngine::new(engine_settings(8), executor);
    let journal = TradeJournal::open(dir.join("logs").join("trades.log")).unwrap();

    Scheduler::new(
        settings,
        ist_clock(),
        state,
        engine,
        gateway,
        Box::new(FileStrategySource::new(dir.join("config.json"))),
        journal,
        started_at,
    )
}
