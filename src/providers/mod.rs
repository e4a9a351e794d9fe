mod giphy;
mod http;
mod lastfm;

use async_trait::async_trait;

use crate::error::SearchError;

pub use giphy::GiphyClient;
pub use http::HttpClient;
pub use lastfm::LastFmClient;

/// Either the requested entity or the provider's own error payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataReply<T> {
    Found(T),
    Error { code: i64, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistInfo {
    pub name: String,
    pub listeners: u64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub name: String,
    pub artist: String,
    pub listeners: u64,
    /// Release date as the provider formats it, e.g. "01 Jan 2000, 00:00".
    pub published: Option<String>,
    pub tags: Vec<String>,
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn artist_info(&self, artist: &str) -> Result<MetadataReply<ArtistInfo>, SearchError>;

    async fn track_info(
        &self,
        artist: &str,
        track: &str,
    ) -> Result<MetadataReply<TrackInfo>, SearchError>;
}

#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Up to `limit` image URLs for `query`, starting at result `offset`.
    async fn search(&self, query: &str, limit: u32, offset: u32)
        -> Result<Vec<String>, SearchError>;
}
