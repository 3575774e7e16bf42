//! On-disk token cache (`{"map": {ticker: token}}`)

use super::TokenMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    map: TokenMap,
}

/// Best-effort persisted ticker → token mapping
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached mapping; `None` when missing or unreadable
    pub fn load(&self) -> Option<TokenMap> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<CacheFile>(&content) {
            Ok(file) => Some(file.map),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt token cache");
                None
            }
        }
    }

    /// Cached mapping, accepted only when its size matches the watchlist size
    ///
    /// Cardinality is the only check: a watchlist with one ticker swapped for
    /// another still hits the cache.
    pub fn load_valid(&self, watchlist_len: usize) -> Option<TokenMap> {
        self.load().filter(|map| map.len() == watchlist_len)
    }

    /// Overwrite the cache with `map`
    pub fn save(&self, map: &TokenMap) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = CacheFile { map: map.clone() };
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Remove the cache file so the next resolution searches every ticker
    pub fn clear(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TokenMap {
        let mut map = TokenMap::new();
        map.insert("INFY".to_string(), "1594".to_string());
        map.insert("SBIN".to_string(), "3045".to_string());
        map
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("nested").join("token_map.json"));

        cache.save(&sample()).unwrap();
        assert_eq!(cache.load(), Some(sample()));
    }

    #[test]
    fn test_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("token_map.json"));
        cache.save(&sample()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(cache.path()).unwrap()).unwrap();
        assert_eq!(raw["map"]["INFY"], "1594");
    }

    #[test]
    fn test_size_mismatch_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("token_map.json"));
        cache.save(&sample()).unwrap();

        assert!(cache.load_valid(2).is_some());
        assert!(cache.load_valid(3).is_none());
    }

    #[test]
    fn test_missing_and_corrupt_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("token_map.json"));
        assert!(cache.load().is_none());

        std::fs::write(cache.path(), "not json").unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("token_map.json"));
        cache.save(&sample()).unwrap();

        cache.clear().unwrap();
        assert!(cache.load().is_none());
        // already gone
        cache.clear().unwrap();
    }
}
