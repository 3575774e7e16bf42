//! In-memory strategy store

use super::{StrategyParams, StrategySource};
use crate::config::ConfigError;
use std::collections::HashMap;

/// Current per-symbol strategies with a process-wide fallback
#[derive(Debug, Clone, Default)]
pub struct StrategyStore {
    strategies: HashMap<String, StrategyParams>,
    defaults: StrategyParams,
}

impl StrategyStore {
    /// Empty store answering every lookup with `defaults`
    pub fn new(defaults: StrategyParams) -> Self {
        Self {
            strategies: HashMap::new(),
            defaults,
        }
    }

    /// Replace the mapping from `source`
    ///
    /// On error the previous mapping is left untouched.
    pub fn reload(&mut self, source: &dyn StrategySource) -> Result<usize, ConfigError> {
        let strategies = source.load()?;
        self.strategies = strategies;
        Ok(self.strategies.len())
    }

    /// Parameters for `symbol`, falling back to the defaults
    pub fn get(&self, symbol: &str) -> &StrategyParams {
        self.strategies.get(symbol).unwrap_or(&self.defaults)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
