//! Benchmarks for price observation and entry/exit evaluation

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use intraday_engine::engine::{
    detect_entries, evaluate_exit, Direction, EngineSettings, EngineState, EntryThresholds,
    Position, PositionEngine,
};
use intraday_engine::execution::PaperExecutor;
use intraday_engine::instrument::TokenMap;
use intraday_engine::price::PriceTracker;
use intraday_engine::strategy::{StrategyParams, StrategyStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn walk(len: usize) -> Vec<Decimal> {
    (0..len)
        .map(|i| dec!(1500) + Decimal::from((i % 17) as i64) - Decimal::from((i % 11) as i64))
        .collect()
}

fn benchmark_observe_and_detect(c: &mut Criterion) {
    let prices = walk(64);
    let params = StrategyParams::default();
    let thresholds = EntryThresholds::default();

    c.bench_function("observe_and_detect", |b| {
        b.iter(|| {
            let mut tracker = PriceTracker::new(3);
            for price in &prices {
                let obs = tracker.observe("INFY", *price);
                black_box(detect_entries(&obs, &params, &thresholds));
            }
        })
    });
}

fn benchmark_exit_rules(c: &mut Criterion) {
    let prices = walk(64);
    let params = StrategyParams::default();

    c.bench_function("evaluate_exit", |b| {
        b.iter(|| {
            let mut position = Position::open("INFY", Direction::Long, dec!(1500), 66, Utc::now());
            for price in &prices {
                black_box(evaluate_exit(&mut position, *price, &params, dec!(0.01)));
            }
        })
    });
}

fn benchmark_engine_cycle(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let prices = walk(64);
    let settings = EngineSettings {
        exchange: "NSE".to_string(),
        product: "C".to_string(),
        budget_per_trade: dec!(100000),
        max_open_positions: 8,
        thresholds: EntryThresholds::default(),
        trailing_stop_pct: dec!(0.01),
    };
    let engine = PositionEngine::new(settings, Arc::new(PaperExecutor::new()));

    c.bench_function("engine_cycle", |b| {
        b.to_async(&runtime).iter(|| async {
            let mut state = EngineState::new(3, StrategyStore::default(), TokenMap::new());
            for price in &prices {
                black_box(engine.on_price(&mut state, "INFY", *price, Utc::now(), true).await);
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_observe_and_detect,
    benchmark_exit_rules,
    benchmark_engine_cycle
);
criterion_main!(benches);
