//! Freshness cache
//!
//! Tracks content hashes between runs so `generate` can skip work when
//! nothing changed. Any change triggers a full rebuild; the site is a
//! handful of pages and per-page incrementality is not worth its
//! bookkeeping.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Cache file path relative to the base directory
const CACHE_FILE: &str = ".folio-cache/db.json";

/// Cache database for change detection
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Hash of folio.yml
    pub config_hash: u64,
    /// Hash of the post index file
    pub index_hash: u64,
    /// Hash of the portfolio data file
    pub portfolio_hash: u64,
    /// Body content hashes, keyed by slug
    pub bodies: HashMap<String, u64>,
    /// Total post count (for detecting additions/deletions)
    pub post_count: usize,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or start empty
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<CacheDb>(&content) {
                if cache.version == Self::VERSION {
                    return cache;
                }
                tracing::info!("Cache version mismatch, rebuilding cache");
            }
        }
        Self::default()
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)?;
        Ok(())
    }

    /// An empty cache means nothing was generated yet
    pub fn is_empty(&self) -> bool {
        self.version == 0
    }

    /// Whether the given snapshot differs from this cache
    pub fn is_stale(&self, current: &CacheDb) -> bool {
        self.config_hash != current.config_hash
            || self.index_hash != current.index_hash
            || self.portfolio_hash != current.portfolio_hash
            || self.post_count != current.post_count
            || self.bodies != current.bodies
    }

    /// Snapshot the current content state
    pub fn snapshot(
        base_dir: &Path,
        content_dir: &Path,
        bodies: impl Iterator<Item = (String, u64)>,
        post_count: usize,
    ) -> Self {
        Self {
            version: Self::VERSION,
            config_hash: hash_file_or_zero(&base_dir.join("folio.yml")),
            index_hash: hash_file_or_zero(&content_dir.join("blogs.json")),
            portfolio_hash: hash_file_or_zero(&content_dir.join("portfolio.json")),
            bodies: bodies.collect(),
            post_count,
        }
    }

    /// Remove the cache directory
    pub fn clear(base_dir: &Path) -> Result<()> {
        let cache_dir = base_dir.join(".folio-cache");
        if cache_dir.exists() {
            fs::remove_dir_all(&cache_dir)?;
            tracing::info!("Cache cleared");
        }
        Ok(())
    }
}

/// Calculate a hash for file content
pub fn hash_content(content: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Hash a file on disk, or 0 when it does not exist or cannot be read
pub fn hash_file_or_zero(path: &Path) -> u64 {
    fs::read_to_string(path)
        .map(|c| hash_content(&c))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_content_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
    }

    #[test]
    fn test_load_missing_cache_is_empty() {
        let dir = TempDir::new().unwrap();
        let cache = CacheDb::load(dir.path());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("folio.yml"), "title: x").unwrap();
        let content_dir = dir.path().join("content");
        fs::create_dir_all(&content_dir).unwrap();
        fs::write(content_dir.join("blogs.json"), r#"{"posts":[]}"#).unwrap();

        let snapshot = CacheDb::snapshot(
            dir.path(),
            &content_dir,
            vec![("hello".to_string(), 42u64)].into_iter(),
            1,
        );
        snapshot.save(dir.path()).unwrap();

        let reloaded = CacheDb::load(dir.path());
        assert!(!reloaded.is_empty());
        assert!(!reloaded.is_stale(&snapshot));
    }

    #[test]
    fn test_staleness_on_body_change() {
        let dir = TempDir::new().unwrap();
        let content_dir = dir.path().join("content");
        fs::create_dir_all(&content_dir).unwrap();

        let before = CacheDb::snapshot(
            dir.path(),
            &content_dir,
            vec![("hello".to_string(), 1u64)].into_iter(),
            1,
        );
        let after = CacheDb::snapshot(
            dir.path(),
            &content_dir,
            vec![("hello".to_string(), 2u64)].into_iter(),
            1,
        );
        assert!(before.is_stale(&after));
    }
}
