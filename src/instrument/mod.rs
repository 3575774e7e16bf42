//! Instrument resolution module
//!
//! Maps watchlist tickers to gateway instrument tokens, persisting the mapping
//! between runs.

mod cache;
mod resolver;

pub use cache::TokenCache;
pub use resolver::{InstrumentResolver, TokenMap};
