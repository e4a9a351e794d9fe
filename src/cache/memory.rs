use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::CacheStore;
use crate::models::{CacheKey, ResultRecord};

/// Process-local cache; contents are lost on restart.
pub struct MemoryCache {
    entries: RwLock<HashMap<CacheKey, (ResultRecord, DateTime<Utc>)>>,
    ttl: Option<Duration>,
}

impl MemoryCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    fn is_expired(&self, stored_at: DateTime<Utc>) -> bool {
        match self.ttl.and_then(|ttl| chrono::Duration::from_std(ttl).ok()) {
            Some(ttl) => Utc::now() - stored_at > ttl,
            None => false,
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn exists(&self, key: &CacheKey) -> bool {
        let expired = match self.entries.read().await.get(key) {
            Some((_, stored_at)) => self.is_expired(*stored_at),
            None => return false,
        };

        if expired {
            let mut entries = self.entries.write().await;
            // Re-check under the write lock; a writer may have refreshed it.
            if entries
                .get(key)
                .is_some_and(|(_, stored_at)| self.is_expired(*stored_at))
            {
                entries.remove(key);
            }
            return false;
        }

        true
    }

    async fn read(&self, key: &CacheKey) -> Result<ResultRecord> {
        self.entries
            .read()
            .await
            .get(key)
            .map(|(record, _)| record.clone())
            .ok_or_else(|| anyhow!("No cache entry for {}", key))
    }

    async fn write(&self, key: &CacheKey, record: &ResultRecord) -> Result<()> {
        let mut entries = self.entries.write().await;
        if self.ttl.is_some() {
            entries.retain(|_, (_, stored_at)| !self.is_expired(*stored_at));
        }
        entries.insert(key.clone(), (record.clone(), Utc::now()));
        Ok(())
    }
}
