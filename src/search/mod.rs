mod finder;
mod inflight;
mod resolver;

use std::sync::Arc;

use crate::cache::CacheStore;
use crate::error::SearchError;
use crate::models::{CacheKey, ResultRecord, SearchRequest};
use crate::providers::{ImageProvider, MetadataProvider};

pub use finder::{find_images, pick_offset, IMAGE_COUNT};
pub use inflight::KeyLocks;
pub use resolver::{check_match, resolve_metadata, MIN_LISTENERS};

/// Runs a search: cache lookup, then metadata lookup, image search and cache
/// write on a miss.
pub struct SearchService {
    cache: Arc<dyn CacheStore>,
    metadata: Arc<dyn MetadataProvider>,
    images: Arc<dyn ImageProvider>,
    in_flight: KeyLocks,
}

impl SearchService {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        metadata: Arc<dyn MetadataProvider>,
        images: Arc<dyn ImageProvider>,
    ) -> Self {
        Self {
            cache,
            metadata,
            images,
            in_flight: KeyLocks::new(),
        }
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<ResultRecord, SearchError> {
        let key = request.cache_key();

        if let Some(record) = self.cached(&key).await {
            return Ok(record);
        }

        let _guard = self.in_flight.acquire(&key).await;
        // Another request may have filled the entry while we waited.
        if let Some(record) = self.cached(&key).await {
            return Ok(record);
        }

        tracing::info!(
            "Cache miss for {}, looking up {} {:?}",
            key,
            request.mode().as_str(),
            request.artist
        );

        let partial = resolve_metadata(self.metadata.as_ref(), request).await?;
        let record = find_images(self.images.as_ref(), partial).await?;

        if let Err(e) = self.cache.write(&key, &record).await {
            tracing::warn!("Failed to cache result for {}: {:#}", key, e);
        }

        Ok(record)
    }

    async fn cached(&self, key: &CacheKey) -> Option<ResultRecord> {
        if !self.cache.exists(key).await {
            return None;
        }

        match self.cache.read(key).await {
            Ok(record) => {
                tracing::debug!("Cache hit for {}", key);
                Some(record)
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache entry {}: {:#}", key, e);
                None
            }
        }
    }
}
