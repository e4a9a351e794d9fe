use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{decode, CacheStore};
use crate::models::{CacheKey, ResultRecord};

/// One `<key>.json` file per entry.
pub struct FileCache {
    dir: PathBuf,
    ttl: Option<Duration>,
}

impl FileCache {
    pub fn new(dir: PathBuf, ttl: Option<Duration>) -> Self {
        Self { dir, ttl }
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn is_expired(&self, modified: SystemTime) -> bool {
        match self.ttl {
            Some(ttl) => SystemTime::now()
                .duration_since(modified)
                .map(|age| age > ttl)
                .unwrap_or(false),
            None => false,
        }
    }
}

#[async_trait]
impl CacheStore for FileCache {
    async fn exists(&self, key: &CacheKey) -> bool {
        match tokio::fs::metadata(self.path_for(key)).await {
            Ok(meta) if meta.is_file() => match meta.modified() {
                Ok(modified) => !self.is_expired(modified),
                Err(_) => true,
            },
            _ => false,
        }
    }

    async fn read(&self, key: &CacheKey) -> Result<ResultRecord> {
        let path = self.path_for(key);
        let payload = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        decode(key, &payload)
    }

    async fn write(&self, key: &CacheKey, record: &ResultRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let payload = serde_json::to_vec(record)?;
        let path = self.path_for(key);
        // Concurrent writers each get their own temp file; the last rename wins.
        let tmp = self
            .dir
            .join(format!("{}.{:08x}.tmp", key, rand::random::<u32>()));

        tokio::fs::write(&tmp, &payload)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e)
                .with_context(|| format!("Failed to move cache entry to {}", path.display()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::sample_record;
    use crate::models::SearchRequest;
    use tempfile::TempDir;

    fn key() -> CacheKey {
        SearchRequest::artist("Radiohead".to_string()).cache_key()
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().join("cache"), None);

        assert!(!cache.exists(&key()).await);
        cache.write(&key(), &sample_record()).await.unwrap();

        assert!(cache.exists(&key()).await);
        assert!(dir.path().join("cache/radiohead_artist.json").is_file());
        assert_eq!(cache.read(&key()).await.unwrap(), sample_record());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_entry() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().to_path_buf(), None);

        cache.write(&key(), &sample_record()).await.unwrap();
        let mut updated = sample_record();
        updated.images.clear();
        cache.write(&key(), &updated).await.unwrap();

        assert_eq!(cache.read(&key()).await.unwrap(), updated);
        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .map(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
                    .unwrap_or(false)
            })
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_an_error() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().to_path_buf(), None);
        std::fs::write(dir.path().join("radiohead_artist.json"), b"{\"title\": \"Radio").unwrap();

        assert!(cache.exists(&key()).await);
        let err = cache.read(&key()).await.unwrap_err();
        assert!(err.to_string().contains("Corrupt cache entry"));
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let cache = FileCache::new(blocker, None);

        assert!(cache.write(&key(), &sample_record()).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_entry_does_not_exist() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().to_path_buf(), Some(Duration::from_millis(10)));

        cache.write(&key(), &sample_record()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!cache.exists(&key()).await);
    }
}
