//! Strategy config sources

use super::StrategyParams;
use crate::config::ConfigError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Anything that can produce the per-symbol strategy mapping
pub trait StrategySource: Send + Sync {
    fn load(&self) -> Result<HashMap<String, StrategyParams>, ConfigError>;
}

/// Reads the generator's JSON file (`{ticker: {...}}`)
#[derive(Debug, Clone)]
pub struct FileStrategySource {
    path: PathBuf,
}

impl FileStrategySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StrategySource for FileStrategySource {
    fn load(&self) -> Result<HashMap<String, StrategyParams>, ConfigError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
