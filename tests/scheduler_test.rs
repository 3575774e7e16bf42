//! Integration tests for the scheduler tick

mod common;

use common::{ist, scheduler, scheduler_settings, MockGateway, SwitchableExecutor};
use intraday_engine::engine::{Direction, ExitReason};
use rust_decimal_macros::dec;
use std::sync::Arc;

fn trade_log(dir: &tempfile::TempDir) -> String {
    std::fs::read_to_string(dir.path().join("logs").join("trades.log")).unwrap_or_default()
}

#[tokio::test]
async fn test_entry_square_off_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let executor = Arc::new(SwitchableExecutor::default());
    let mut scheduler = scheduler(
        dir.path(),
        gateway.clone(),
        executor.clone(),
        &[("INFY", "1594")],
        scheduler_settings(&[]),
        ist(9, 59, 0),
    );

    gateway.set_price("1594", dec!(1500));
    let report = scheduler.tick(ist(10, 0, 0)).await.unwrap();
    assert_eq!(report.polled, 1);
    assert!(report.entries.is_empty());

    gateway.set_price("1594", dec!(1504));
    let report = scheduler.tick(ist(10, 0, 10)).await.unwrap();
    assert_eq!(report.entries.len(), 1);
    assert!(trade_log(&dir).contains("ENTRY LONG INFY @ 1504.00 Qty: 66"));

    // square-off closes the long; the breakout on the same tick is suppressed
    gateway.set_price("1594", dec!(1505));
    let report = scheduler.tick(ist(15, 10, 0)).await.unwrap();
    assert_eq!(report.squared_off.len(), 1);
    assert_eq!(report.squared_off[0].exit_reason, ExitReason::SquareOff);
    assert_eq!(report.squared_off[0].realized_pnl, dec!(66));
    assert!(report.entries.is_empty());
    assert!(trade_log(&dir).contains("Reason: EOD Square-off"));

    {
        let state = scheduler.state();
        let state = state.lock().await;
        assert!(state.positions.is_empty());
        assert_eq!(state.ledger.len(), 1);
    }

    let report = scheduler.tick(ist(15, 30, 0)).await.unwrap();
    let summary = report.summary.expect("summary due");
    assert_eq!(summary.trade_count, 1);
    assert_eq!(summary.net_pnl, dec!(66));
    assert_eq!(summary.long_pnl, dec!(66));
    assert!(trade_log(&dir).contains("DAILY TRADE & P&L SUMMARY"));
    assert!(trade_log(&dir).contains("Net P&L: 66.00"));

    {
        let state = scheduler.state();
        let state = state.lock().await;
        assert!(state.ledger.is_empty());
        assert_eq!(state.ledger.daily_pnl(), dec!(0));
    }

    // once per day
    let report = scheduler.tick(ist(15, 31, 0)).await.unwrap();
    assert!(report.summary.is_none());
}

#[tokio::test]
async fn test_empty_day_summary() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let mut scheduler = scheduler(
        dir.path(),
        gateway.clone(),
        Arc::new(SwitchableExecutor::default()),
        &[("INFY", "1594")],
        scheduler_settings(&[]),
        ist(15, 29, 0),
    );
    gateway.set_price("1594", dec!(1500));

    let report = scheduler.tick(ist(15, 30, 5)).await.unwrap();
    assert_eq!(report.summary.unwrap().trade_count, 0);
    assert!(trade_log(&dir).contains("Daily Summary: No trades executed today"));
}

#[tokio::test]
async fn test_price_failure_skips_only_that_symbol() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let mut scheduler = scheduler(
        dir.path(),
        gateway.clone(),
        Arc::new(SwitchableExecutor::default()),
        &[("INFY", "1594"), ("SBIN", "3045")],
        scheduler_settings(&[]),
        ist(10, 0, 0),
    );
    gateway.set_price("3045", dec!(600));

    let report = scheduler.tick(ist(10, 0, 10)).await.unwrap();
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.polled, 1);

    let state = scheduler.state();
    let state = state.lock().await;
    assert!(state.prices.range("SBIN").is_some());
    assert!(state.prices.range("INFY").is_none());
}

#[tokio::test]
async fn test_excluded_symbol_never_polled() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let mut scheduler = scheduler(
        dir.path(),
        gateway.clone(),
        Arc::new(SwitchableExecutor::default()),
        &[("INFY", "1594"), ("TATAMOTORS", "3456")],
        scheduler_settings(&["TATAMOTORS"]),
        ist(10, 0, 0),
    );
    gateway.set_price("1594", dec!(1500));
    gateway.set_price("3456", dec!(900));

    scheduler.tick(ist(10, 0, 10)).await.unwrap();
    assert_eq!(*gateway.quoted.lock().unwrap(), vec!["1594".to_string()]);
}

#[tokio::test]
async fn test_square_off_retries_when_price_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = Arc::new(MockGateway::new());
    let mut scheduler = scheduler(
        dir.path(),
        gateway.clone(),
        Arc::new(SwitchableExecutor::default()),
        &[("INFY", "1594")],
        scheduler_settings(&[]),
        ist(10, 0, 0),
    );

    gateway.set_price("1594", dec!(1500));
    scheduler.tick(ist(10, 0, 10)).await.unwrap();
    gateway.set_price("1594", dec!(1504));
    scheduler.tick(ist(10, 0, 20)).await.unwrap();

    gateway.fail_price("1594");
    let report = scheduler.tick(ist(15, 10, 0)).await.unwrap();
    assert!(report.squared_off.is_empty());
    {
        let state = scheduler.state();
        assert!(state.lock().await.positions.contains("INFY", Direction::Long));
    }

    gateway.set_price("1594", dec!(1490));
    let report = scheduler.tick(ist(15, 10, 10)).await.unwrap();
    assert_eq!(report.squared_off.len(), 1);
}

#[tokio::test]
async fn test_reload_is_fail_soft() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");
    std::fs::write(
        &config_path,
        r#"{"INFY": {"class":"A","allow_short":false,"breakout_long":0.001,"breakout_short":0.002,"target":0.015,"sl":0.005,"leverage":2.0}}"#,
    )
    .unwrap();

    let gateway = Arc::new(MockGateway::new());
    let mut scheduler = scheduler(
        dir.path(),
        gateway.clone(),
        Arc::new(SwitchableExecutor::default()),
        &[("INFY", "1594")],
        scheduler_settings(&[]),
        ist(9, 30, 0),
    );
    gateway.set_price("1594", dec!(1500));

    let report = scheduler.tick(ist(9, 40, 0)).await.unwrap();
    assert!(!report.reloaded);

    let report = scheduler.tick(ist(9, 45, 0)).await.unwrap();
    assert!(report.reloaded);
    {
        let state = scheduler.state();
        let state = state.lock().await;
        assert_eq!(state.strategies.get("INFY").class, "A");
        assert!(!state.strategies.get("INFY").allow_short);
    }

    std::fs::write(&config_path, "{ truncated").unwrap();
    let report = scheduler.tick(ist(10, 0, 0)).await.unwrap();
    assert!(!report.reloaded);

    let state = scheduler.state();
    let state = state.lock().await;
    assert_eq!(state.strategies.get("INFY").class, "A");
    assert_eq!(state.strategies.get("INFY").leverage, dec!(2));
}
