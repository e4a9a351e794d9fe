use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};

use super::{decode, CacheStore};
use crate::models::{CacheKey, ResultRecord};

pub type CachePool = Pool<SqliteConnectionManager>;

/// Embedded store: one row per cache key holding the JSON payload.
pub struct SqliteCache {
    pool: CachePool,
    ttl: Option<Duration>,
}

impl SqliteCache {
    pub fn open(path: &Path, ttl: Option<Duration>) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::new(manager)?;
        init_schema(&pool)?;
        Ok(Self { pool, ttl })
    }

    fn stored_at(&self, key: &CacheKey) -> Result<Option<i64>> {
        let conn = self.pool.get()?;
        let stored_at = conn
            .query_row(
                "SELECT stored_at FROM result_cache WHERE cache_key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(stored_at)
    }

    fn is_expired(&self, stored_at: i64) -> bool {
        match self.ttl {
            Some(ttl) => {
                let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
                Utc::now().timestamp().saturating_sub(stored_at) > ttl_secs
            }
            None => false,
        }
    }
}

fn init_schema(pool: &CachePool) -> Result<()> {
    let conn = pool.get()?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS result_cache (
            cache_key TEXT PRIMARY KEY,
            payload TEXT NOT NULL,
            stored_at INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

#[async_trait]
impl CacheStore for SqliteCache {
    async fn exists(&self, key: &CacheKey) -> bool {
        match self.stored_at(key) {
            Ok(Some(stored_at)) => !self.is_expired(stored_at),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!("Cache lookup for {} failed: {}", key, e);
                false
            }
        }
    }

    async fn read(&self, key: &CacheKey) -> Result<ResultRecord> {
        let conn = self.pool.get()?;
        let payload: String = conn.query_row(
            "SELECT payload FROM result_cache WHERE cache_key = ?1",
            params![key.as_str()],
            |row| row.get(0),
        )?;
        decode(key, payload.as_bytes())
    }

    async fn write(&self, key: &CacheKey, record: &ResultRecord) -> Result<()> {
        let conn = self.pool.get()?;
        let payload = serde_json::to_string(record)?;

        conn.execute(
            "INSERT INTO result_cache (cache_key, payload, stored_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(cache_key) DO UPDATE SET payload = ?2, stored_at = ?3",
            params![key.as_str(), payload, Utc::now().timestamp()],
        )?;

        Ok(())
    }
}
