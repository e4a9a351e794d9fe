mod file;
mod memory;
mod sqlite;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{CacheBackend, CacheConfig};
use crate::models::{CacheKey, ResultRecord};

pub use file::FileCache;
pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

/// Storage for assembled search results.
///
/// Entries are never updated in place; a write replaces whatever was stored
/// under the key. Callers treat write failures as non-fatal.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Whether a live (not expired) entry is stored under `key`.
    async fn exists(&self, key: &CacheKey) -> bool;

    /// Load the entry under `key`. Fails if it is missing or does not decode
    /// as a `ResultRecord`.
    async fn read(&self, key: &CacheKey) -> Result<ResultRecord>;

    async fn write(&self, key: &CacheKey, record: &ResultRecord) -> Result<()>;
}

pub fn open_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>> {
    let store: Arc<dyn CacheStore> = match &config.backend {
        CacheBackend::File { dir } => {
            tracing::info!("Using file cache in {}", dir.display());
            Arc::new(FileCache::new(dir.clone(), config.ttl))
        }
        CacheBackend::Sqlite { path } => {
            tracing::info!("Using sqlite cache at {}", path.display());
            Arc::new(SqliteCache::open(path, config.ttl)?)
        }
        CacheBackend::Memory => {
            tracing::info!("Using in-memory cache");
            Arc::new(MemoryCache::new(config.ttl))
        }
    };

    Ok(store)
}

/// Decode a stored payload, rejecting anything that is not a complete record.
fn decode(key: &CacheKey, payload: &[u8]) -> Result<ResultRecord> {
    serde_json::from_slice(payload)
        .map_err(|e| anyhow::anyhow!("Corrupt cache entry {}: {}", key, e))
}

#[cfg(test)]
pub(crate) fn sample_record() -> ResultRecord {
    ResultRecord {
        title: "Radiohead".to_string(),
        subtitle: "Artist Profile".to_string(),
        tags: "alternative, rock".to_string(),
        search_q: "Radiohead".to_string(),
        random_limit: 50,
        images: vec![
            "https://media.giphy.com/a.gif".to_string(),
            "https://media.giphy.com/b.gif".to_string(),
        ],
    }
}
