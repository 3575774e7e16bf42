//! Engine metrics
//!
//! Thin wrappers over the `metrics` facade so metric names live in one place.
//! Without an installed recorder every call is a no-op.

use std::time::Duration;

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Open long + short positions
    OpenPositions,
    /// Realized P&L since the last daily summary
    DailyPnl,
    /// Symbols with a resolved instrument token
    ResolvedSymbols,
    /// Strategy entries loaded from the config file
    StrategyEntries,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Orders accepted by the executor
    OrdersSubmitted,
    /// Orders rejected or failed
    OrdersFailed,
    /// Session re-authentications triggered by an invalidation marker
    Reauthentications,
    /// Per-symbol price fetches that failed
    PriceFetchFailures,
    /// Positions closed
    TradesClosed,
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::OpenPositions => "intraday_open_positions",
            GaugeMetric::DailyPnl => "intraday_daily_pnl",
            GaugeMetric::ResolvedSymbols => "intraday_resolved_symbols",
            GaugeMetric::StrategyEntries => "intraday_strategy_entries",
        }
    }
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::OrdersSubmitted => "intraday_orders_submitted_total",
            CounterMetric::OrdersFailed => "intraday_orders_failed_total",
            CounterMetric::Reauthentications => "intraday_reauthentications_total",
            CounterMetric::PriceFetchFailures => "intraday_price_fetch_failures_total",
            CounterMetric::TradesClosed => "intraday_trades_closed_total",
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(metric.name()).increment(1);
}

/// Record how long a scheduler tick took
pub fn record_tick_duration(duration: Duration) {
    metrics::histogram!("intraday_tick_duration_ms").record(duration.as_secs_f64() * 1000.0);
    tracing::debug!(value_ms = duration.as_millis(), "Tick completed");
}
