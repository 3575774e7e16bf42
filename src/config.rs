//! Configuration types for the intraday engine
//!
//! Everything except credentials lives in one TOML file. Credentials are read
//! from the environment (optionally via `.env`) so they never land in the repo.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration and input-file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// File contents are not valid JSON of the expected shape
    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Watchlist parsed but holds no tickers
    #[error("no tickers found in {0}")]
    EmptyWatchlist(PathBuf),
    /// Time-of-day value is not HH:MM
    #[error("invalid time of day: {0}")]
    InvalidTime(String),
    /// Required environment variable missing
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Brokerage gateway configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Token endpoint used for the hashed-credential handshake
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Base URL of the trading API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Exchange segment all instruments trade on
    #[serde(default = "default_exchange")]
    pub exchange: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Trading-symbol suffix that denotes the equity segment
    #[serde(default = "default_equity_suffix")]
    pub equity_suffix: String,
    /// Product code sent with every order
    #[serde(default = "default_product_type")]
    pub product_type: String,
}

fn default_auth_url() -> String {
    "https://authapi.flattrade.in/trade/apitoken".to_string()
}
fn default_base_url() -> String {
    "https://piconnect.flattrade.in/PiConnectTP".to_string()
}
fn default_exchange() -> String {
    "NSE".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_equity_suffix() -> String {
    "-EQ".to_string()
}
fn default_product_type() -> String {
    "C".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            base_url: default_base_url(),
            exchange: default_exchange(),
            timeout_secs: default_timeout_secs(),
            equity_suffix: default_equity_suffix(),
            product_type: default_product_type(),
        }
    }
}

/// Position engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Capital allotted to a single entry before leverage
    #[serde(default = "default_budget")]
    pub budget_per_trade: Decimal,
    /// Cap on long + short positions across all symbols
    #[serde(default = "default_max_open_positions")]
    pub max_open_positions: usize,
    /// Number of recent prices kept per symbol
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Rebound off the session low that triggers a bounce-back long
    #[serde(default = "default_bounce_rebound_pct")]
    pub bounce_rebound_pct: Decimal,
    /// Single-interval fall that triggers a quick-drop short
    #[serde(default = "default_quick_drop_pct")]
    pub quick_drop_pct: Decimal,
    /// Distance from the best price since entry that trips the trailing stop
    #[serde(default = "default_trailing_stop_pct")]
    pub trailing_stop_pct: Decimal,
    /// Refuse new entries once the square-off time has passed
    #[serde(default = "default_true")]
    pub block_entries_after_square_off: bool,
}

fn default_budget() -> Decimal {
    Decimal::new(100_000, 0)
}
fn default_max_open_positions() -> usize {
    8
}
fn default_history_window() -> usize {
    3
}
fn default_bounce_rebound_pct() -> Decimal {
    Decimal::new(8, 3) // 0.8%
}
fn default_quick_drop_pct() -> Decimal {
    Decimal::new(12, 3) // 1.2%
}
fn default_trailing_stop_pct() -> Decimal {
    Decimal::new(1, 2) // 1%
}
fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            budget_per_trade: default_budget(),
            max_open_positions: default_max_open_positions(),
            history_window: default_history_window(),
            bounce_rebound_pct: default_bounce_rebound_pct(),
            quick_drop_pct: default_quick_drop_pct(),
            trailing_stop_pct: default_trailing_stop_pct(),
            block_entries_after_square_off: true,
        }
    }
}

/// Scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_reload_interval_secs")]
    pub reload_interval_secs: u64,
    /// Exchange timezone as a fixed offset from UTC
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(
        default = "default_square_off_time",
        deserialize_with = "hhmm::deserialize",
        serialize_with = "hhmm::serialize"
    )]
    pub square_off_time: NaiveTime,
    #[serde(
        default = "default_summary_time",
        deserialize_with = "hhmm::deserialize",
        serialize_with = "hhmm::serialize"
    )]
    pub summary_time: NaiveTime,
    /// Pause between symbols within a tick (gateway rate limit)
    #[serde(default = "default_inter_symbol_delay_ms")]
    pub inter_symbol_delay_ms: u64,
    /// Pause between instrument searches during resolution
    #[serde(default = "default_search_delay_ms")]
    pub search_delay_ms: u64,
    /// Symbols that are resolved but never polled
    #[serde(default)]
    pub excluded_symbols: Vec<String>,
}

fn default_poll_interval_secs() -> u64 {
    10
}
fn default_reload_interval_secs() -> u64 {
    15 * 60
}
fn default_utc_offset_minutes() -> i32 {
    5 * 60 + 30
}
fn default_square_off_time() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 10, 0).unwrap_or_default()
}
fn default_summary_time() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 30, 0).unwrap_or_default()
}
fn default_inter_symbol_delay_ms() -> u64 {
    200
}
fn default_search_delay_ms() -> u64 {
    300
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            reload_interval_secs: default_reload_interval_secs(),
            utc_offset_minutes: default_utc_offset_minutes(),
            square_off_time: default_square_off_time(),
            summary_time: default_summary_time(),
            inter_symbol_delay_ms: default_inter_symbol_delay_ms(),
            search_delay_ms: default_search_delay_ms(),
            excluded_symbols: vec![],
        }
    }
}

/// File locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    #[serde(default = "default_watchlist")]
    pub watchlist: PathBuf,
    #[serde(default = "default_strategy_config")]
    pub strategy_config: PathBuf,
    #[serde(default = "default_token_cache")]
    pub token_cache: PathBuf,
    #[serde(default = "default_trade_log")]
    pub trade_log: PathBuf,
    /// External strategy-generation step; `None` disables regeneration
    #[serde(default = "default_generator")]
    pub generator: Option<GeneratorConfig>,
}

/// Command that regenerates the strategy config file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

fn default_watchlist() -> PathBuf {
    PathBuf::from("data/stocks.json")
}
fn default_strategy_config() -> PathBuf {
    PathBuf::from("data/config.json")
}
fn default_token_cache() -> PathBuf {
    PathBuf::from("data/token_map.json")
}
fn default_trade_log() -> PathBuf {
    PathBuf::from("logs/trades.log")
}
fn default_generator() -> Option<GeneratorConfig> {
    Some(GeneratorConfig {
        program: "python".to_string(),
        args: vec!["brain.py".to_string()],
        working_dir: Some(PathBuf::from("data")),
    })
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            watchlist: default_watchlist(),
            strategy_config: default_strategy_config(),
            token_cache: default_token_cache(),
            trade_log: default_trade_log(),
            generator: default_generator(),
        }
    }
}

/// Execution engine configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExecutionConfig {
    #[serde(default)]
    pub mode: ExecutionMode,
}

/// Execution mode: paper trading or live
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Paper,
    Live,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus scrape port; metrics stay in-process when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

/// Brokerage credentials
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    /// One-time code that rotates daily
    pub request_code: String,
    pub api_secret: String,
    pub user_id: String,
}

impl Credentials {
    /// Read credentials from the environment
    ///
    /// Expects `FLAT_API_KEY`, `FLAT_REQUEST_CODE`, `FLAT_SECRET_KEY` and
    /// `FLAT_USER_ID`.
    pub fn from_env() -> Result<Self, ConfigError> {
        fn var(name: &'static str) -> Result<String, ConfigError> {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        }

        Ok(Self {
            api_key: var("FLAT_API_KEY")?,
            request_code: var("FLAT_REQUEST_CODE")?,
            api_secret: var("FLAT_SECRET_KEY")?,
            user_id: var("FLAT_USER_ID")?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***")
            .field("request_code", &"***")
            .field("api_secret", &"***")
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct WatchlistFile {
    tickers: Vec<String>,
}

/// Load the watchlist (`{"tickers": [...]}`)
pub fn load_watchlist(path: impl AsRef<Path>) -> Result<Vec<String>, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: WatchlistFile = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if file.tickers.is_empty() {
        return Err(ConfigError::EmptyWatchlist(path.to_path_buf()));
    }
    Ok(file.tickers)
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

mod hhmm {
    use super::ConfigError;
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(s: &str) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| ConfigError::InvalidTime(s.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(d)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format("%H:%M").to_string())
    }
}
