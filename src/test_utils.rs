// Test doubles for the upstream providers
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SearchError;
use crate::providers::{ArtistInfo, ImageProvider, MetadataProvider, MetadataReply, TrackInfo};

/// Build an artist with the given listener count and a couple of tags
pub fn test_artist(name: &str, listeners: u64) -> ArtistInfo {
    ArtistInfo {
        name: name.to_string(),
        listeners,
        tags: vec!["rock".to_string(), "alternative".to_string()],
    }
}

/// Build a track with a release date
pub fn test_track(artist: &str, track: &str, listeners: u64) -> TrackInfo {
    TrackInfo {
        name: track.to_string(),
        artist: artist.to_string(),
        listeners,
        published: Some("21 Sep 1992, 00:00".to_string()),
        tags: vec!["grunge".to_string()],
    }
}

/// Metadata provider answering from fixed tables. Unknown names get Last.fm's
/// "not found" error payload.
#[derive(Default)]
pub struct MockMetadata {
    artists: HashMap<String, ArtistInfo>,
    tracks: HashMap<(String, String), TrackInfo>,
    calls: AtomicUsize,
    delay: Option<Duration>,
    broken: bool,
}

impl MockMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artist(self, info: ArtistInfo) -> Self {
        let query = info.name.clone();
        self.with_artist_for(&query, info)
    }

    /// Answer `query` with `info`, even when the names differ.
    pub fn with_artist_for(mut self, query: &str, info: ArtistInfo) -> Self {
        self.artists.insert(query.to_lowercase(), info);
        self
    }

    pub fn with_track(mut self, info: TrackInfo) -> Self {
        self.tracks
            .insert((info.artist.to_lowercase(), info.name.to_lowercase()), info);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call fails as if the provider sent garbage.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<(), SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.broken {
            return Err(SearchError::MalformedResponse {
                service: "Last.fm",
                reason: "expected value at line 1 column 1".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found<T>() -> MetadataReply<T> {
    MetadataReply::Error {
        code: 6,
        message: "The artist you supplied could not be found".to_string(),
    }
}

#[async_trait]
impl MetadataProvider for MockMetadata {
    async fn artist_info(&self, artist: &str) -> Result<MetadataReply<ArtistInfo>, SearchError> {
        self.enter().await?;
        Ok(self
            .artists
            .get(&artist.to_lowercase())
            .cloned()
            .map(MetadataReply::Found)
            .unwrap_or_else(not_found))
    }

    async fn track_info(
        &self,
        artist: &str,
        track: &str,
    ) -> Result<MetadataReply<TrackInfo>, SearchError> {
        self.enter().await?;
        Ok(self
            .tracks
            .get(&(artist.to_lowercase(), track.to_lowercase()))
            .cloned()
            .map(MetadataReply::Found)
            .unwrap_or_else(not_found))
    }
}

/// Image provider returning `count` numbered GIF URLs.
pub struct MockImages {
    count: u32,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, u32, u32)>>,
}

impl MockImages {
    pub fn with_urls(count: u32) -> Self {
        Self {
            count,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(query, limit, offset)` of the most recent search.
    pub fn last_request(&self) -> Option<(String, u32, u32)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for MockImages {
    async fn search(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<String>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((query.to_string(), limit, offset));

        Ok((0..self.count.min(limit))
            .map(|i| format!("https://media.giphy.com/media/{}/giphy.gif", i))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_metadata_lookup_ignores_case() {
        let provider = MockMetadata::new().with_artist(test_artist("Queen", 1_000_000));

        let reply = provider.artist_info("QUEEN").await.unwrap();
        assert!(matches!(reply, MetadataReply::Found(ref info) if info.name == "Queen"));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_metadata_unknown_artist() {
        let provider = MockMetadata::new();

        let reply = provider.artist_info("Nobody").await.unwrap();
        assert!(matches!(reply, MetadataReply::Error { code: 6, .. }));
    }

    #[tokio::test]
    async fn test_mock_images_respects_limit() {
        let provider = MockImages::with_urls(10);

        let urls = provider.search("Queen", 6, 3).await.unwrap();
        assert_eq!(urls.len(), 6);
        assert_eq!(provider.last_request(), Some(("Queen".to_string(), 6, 3)));
    }
}
