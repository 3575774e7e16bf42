//! Per-symbol decision cycle

use super::{
    detect_entries, evaluate_exit, position_size, Direction, EngineState, EntryThresholds,
    EntryTrigger, ExitReason, Position,
};
use crate::config::Config;
use crate::execution::{OrderExecutor, OrderRequest, OrderSide, OrderType};
use crate::ledger::TradeRecord;
use crate::price::Observation;
use crate::strategy::StrategyParams;
use crate::telemetry::{self, CounterMetric};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Engine-wide settings
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub exchange: String,
    pub product: String,
    pub budget_per_trade: Decimal,
    pub max_open_positions: usize,
    pub thresholds: EntryThresholds,
    pub trailing_stop_pct: Decimal,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            exchange: config.gateway.exchange.clone(),
            product: config.gateway.product_type.clone(),
            budget_per_trade: config.engine.budget_per_trade,
            max_open_positions: config.engine.max_open_positions,
            thresholds: EntryThresholds {
                bounce_rebound_pct: config.engine.bounce_rebound_pct,
                quick_drop_pct: config.engine.quick_drop_pct,
            },
            trailing_stop_pct: config.engine.trailing_stop_pct,
        }
    }
}

/// What one cycle did
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub observation: Observation,
    /// Entries opened, with the trigger that fired them
    pub entries: Vec<(EntryTrigger, Position)>,
    pub exits: Vec<TradeRecord>,
}

/// Applies detectors and exit rules, placing orders through the executor
pub struct PositionEngine {
    settings: EngineSettings,
    executor: Arc<dyn OrderExecutor>,
}

impl PositionEngine {
    pub fn new(settings: EngineSettings, executor: Arc<dyn OrderExecutor>) -> Self {
        Self { settings, executor }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Run one cycle for `symbol` at `price`
    ///
    /// Folds the price into range and history, runs entry detectors when
    /// `entries_allowed`, then evaluates exit rules for both sides.
    pub async fn on_price(
        &self,
        state: &mut EngineState,
        symbol: &str,
        price: Decimal,
        now: DateTime<Utc>,
        entries_allowed: bool,
    ) -> CycleReport {
        let observation = state.prices.observe(symbol, price);
        let params = state.strategies.get(symbol).clone();

        let entries = if entries_allowed {
            self.run_entries(state, symbol, &observation, &params, now).await
        } else {
            Vec::new()
        };
        let exits = self.run_exits(state, symbol, price, &params, now).await;

        CycleReport {
            observation,
            entries,
            exits,
        }
    }

    async fn run_entries(
        &self,
        state: &mut EngineState,
        symbol: &str,
        observation: &Observation,
        params: &StrategyParams,
        now: DateTime<Utc>,
    ) -> Vec<(EntryTrigger, Position)> {
        let mut opened = Vec::new();

        for trigger in detect_entries(observation, params, &self.settings.thresholds) {
            if state.positions.total() >= self.settings.max_open_positions {
                tracing::info!(
                    symbol,
                    %trigger,
                    open = state.positions.total(),
                    "Max positions reached, entry skipped"
                );
                break;
            }

            let direction = trigger.direction();
            if state.positions.contains(symbol, direction) {
                continue;
            }

            if let Some(position) = self
                .enter(state, symbol, direction, trigger, observation.price, params.leverage, now)
                .await
            {
                opened.push((trigger, position));
            }
        }

        opened
    }

    #[allow(clippy::too_many_arguments)]
    async fn enter(
        &self,
        state: &mut EngineState,
        symbol: &str,
        direction: Direction,
        trigger: EntryTrigger,
        price: Decimal,
        leverage: Decimal,
        now: DateTime<Utc>,
    ) -> Option<Position> {
        let quantity = position_size(leverage, self.settings.budget_per_trade, price);
        if quantity == 0 {
            tracing::info!(symbol, %price, %trigger, "Entry skipped, budget below one share");
            return None;
        }

        let order = self.order(state, symbol, direction.entry_side(), quantity);
        match self.executor.submit(&order).await {
            Ok(ack) => {
                telemetry::increment(CounterMetric::OrdersSubmitted);
                let position = Position::open(symbol, direction, price, quantity, now);
                state.positions.insert(position.clone());
                tracing::info!(
                    symbol,
                    %direction,
                    %trigger,
                    %price,
                    quantity,
                    %leverage,
                    order_id = %ack.order_id,
                    "Position opened"
                );
                Some(position)
            }
            Err(e) => {
                telemetry::increment(CounterMetric::OrdersFailed);
                tracing::warn!(symbol, %direction, %trigger, error = %e, "Entry order failed");
                None
            }
        }
    }

    async fn run_exits(
        &self,
        state: &mut EngineState,
        symbol: &str,
        price: Decimal,
        params: &StrategyParams,
        now: DateTime<Utc>,
    ) -> Vec<TradeRecord> {
        let mut closed = Vec::new();

        for direction in [Direction::Long, Direction::Short] {
            let Some(position) = state.positions.get_mut(symbol, direction) else {
                continue;
            };
            let Some(reason) =
                evaluate_exit(position, price, params, self.settings.trailing_stop_pct)
            else {
                continue;
            };
            if let Some(trade) = self.close(state, symbol, direction, price, reason, now).await {
                closed.push(trade);
            }
        }

        closed
    }

    /// Close one position with an exit order
    ///
    /// The position is removed and the trade recorded only once the order is
    /// accepted; on failure it stays open and is re-evaluated next cycle.
    pub async fn close(
        &self,
        state: &mut EngineState,
        symbol: &str,
        direction: Direction,
        price: Decimal,
        reason: ExitReason,
        now: DateTime<Utc>,
    ) -> Option<TradeRecord> {
        let quantity = state.positions.get(symbol, direction)?.quantity;
        let order = self.order(state, symbol, direction.exit_side(), quantity);

        if let Err(e) = self.executor.submit(&order).await {
            telemetry::increment(CounterMetric::OrdersFailed);
            tracing::warn!(symbol, %direction, %reason, error = %e, "Exit order failed, position kept");
            return None;
        }
        telemetry::increment(CounterMetric::OrdersSubmitted);

        let position = state.positions.remove(symbol, direction)?;
        let trade = position.close(price, now, reason);
        state.ledger.record(trade.clone());
        telemetry::increment(CounterMetric::TradesClosed);

        tracing::info!(
            symbol,
            %direction,
            %price,
            quantity = trade.quantity,
            pnl = %trade.realized_pnl,
            %reason,
            "Position closed"
        );
        Some(trade)
    }

    /// Close both sides of `symbol` at `price` for end of day
    pub async fn square_off(
        &self,
        state: &mut EngineState,
        symbol: &str,
        price: Decimal,
        now: DateTime<Utc>,
    ) -> Vec<TradeRecord> {
        let mut closed = Vec::new();
        for direction in [Direction::Long, Direction::Short] {
            if !state.positions.contains(symbol, direction) {
                continue;
            }
            if let Some(trade) = self
                .close(state, symbol, direction, price, ExitReason::SquareOff, now)
                .await
            {
                closed.push(trade);
            }
        }
        closed
    }

    fn order(
        &self,
        state: &EngineState,
        symbol: &str,
        side: OrderSide,
        quantity: u32,
    ) -> OrderRequest {
        OrderRequest {
            exchange: self.settings.exchange.clone(),
            symbol: symbol.to_string(),
            token: state.instruments.get(symbol).cloned().unwrap_or_default(),
            side,
            quantity,
            order_type: OrderType::Market,
            product: self.settings.product.clone(),
        }
    }
}
