use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{ArtistInfo, HttpClient, MetadataProvider, MetadataReply, TrackInfo};
use crate::error::SearchError;

const SERVICE: &str = "Last.fm";
const API_ROOT: &str = "https://ws.audioscrobbler.com/2.0/";

/// Every Last.fm answer may carry `error` + `message` instead of the payload.
#[derive(Debug, Deserialize)]
struct LastFmResponse<T> {
    #[serde(default)]
    error: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(flatten)]
    data: T,
}

#[derive(Debug, Deserialize)]
struct ArtistEnvelope {
    #[serde(default)]
    artist: Option<Artist>,
}

#[derive(Debug, Deserialize)]
struct TrackEnvelope {
    #[serde(default)]
    track: Option<Track>,
}

#[derive(Debug, Deserialize)]
struct Artist {
    name: String,
    stats: Option<Stats>,
    tags: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Stats {
    listeners: Option<Count>,
}

#[derive(Debug, Deserialize)]
struct Track {
    name: String,
    artist: TrackArtist,
    listeners: Option<Count>,
    wiki: Option<Wiki>,
    toptags: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TrackArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Wiki {
    published: Option<String>,
}

/// Last.fm sends counts as strings, but be lenient.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Count {
    Number(u64),
    Text(String),
}

impl Count {
    fn value(&self) -> u64 {
        match self {
            Count::Number(n) => *n,
            Count::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

pub struct LastFmClient {
    api_key: String,
    http: HttpClient,
}

impl LastFmClient {
    pub fn new(api_key: String, http: HttpClient) -> Self {
        Self { api_key, http }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<LastFmResponse<T>, SearchError> {
        let response = self.http.get(SERVICE, url).await?;
        let status = response.status();
        let body = response.text().await.map_err(|e| SearchError::Upstream {
            service: SERVICE,
            source: e.without_url(),
        })?;

        // Error payloads come back with non-2xx statuses too, so parse first.
        serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                SearchError::MalformedResponse {
                    service: SERVICE,
                    reason: e.to_string(),
                }
            } else {
                SearchError::UpstreamStatus {
                    service: SERVICE,
                    status,
                }
            }
        })
    }
}

#[async_trait]
impl MetadataProvider for LastFmClient {
    async fn artist_info(&self, artist: &str) -> Result<MetadataReply<ArtistInfo>, SearchError> {
        let url = format!(
            "{}?method=artist.getinfo&artist={}&api_key={}&format=json",
            API_ROOT,
            urlencoding::encode(artist),
            self.api_key
        );

        tracing::debug!("Fetching Last.fm artist info for {}", artist);
        artist_reply(self.fetch(&url).await?)
    }

    async fn track_info(
        &self,
        artist: &str,
        track: &str,
    ) -> Result<MetadataReply<TrackInfo>, SearchError> {
        let url = format!(
            "{}?method=track.getinfo&artist={}&track={}&api_key={}&format=json",
            API_ROOT,
            urlencoding::encode(artist),
            urlencoding::encode(track),
            self.api_key
        );

        tracing::debug!("Fetching Last.fm track info for {} - {}", artist, track);
        track_reply(self.fetch(&url).await?)
    }
}

fn artist_reply(
    response: LastFmResponse<ArtistEnvelope>,
) -> Result<MetadataReply<ArtistInfo>, SearchError> {
    if let Some(code) = response.error {
        return Ok(provider_error(code, response.message));
    }

    let artist = response.data.artist.ok_or_else(|| SearchError::MalformedResponse {
        service: SERVICE,
        reason: "missing artist object".to_string(),
    })?;

    Ok(MetadataReply::Found(ArtistInfo {
        listeners: artist
            .stats
            .and_then(|s| s.listeners)
            .map(|c| c.value())
            .unwrap_or(0),
        tags: artist.tags.as_ref().map(tag_names).unwrap_or_default(),
        name: artist.name,
    }))
}

fn track_reply(
    response: LastFmResponse<TrackEnvelope>,
) -> Result<MetadataReply<TrackInfo>, SearchError> {
    if let Some(code) = response.error {
        return Ok(provider_error(code, response.message));
    }

    let track = response.data.track.ok_or_else(|| SearchError::MalformedResponse {
        service: SERVICE,
        reason: "missing track object".to_string(),
    })?;

    Ok(MetadataReply::Found(TrackInfo {
        name: track.name,
        artist: track.artist.name,
        listeners: track.listeners.map(|c| c.value()).unwrap_or(0),
        published: track
            .wiki
            .and_then(|w| w.published)
            .filter(|p| !p.trim().is_empty()),
        tags: track.toptags.as_ref().map(tag_names).unwrap_or_default(),
    }))
}

fn provider_error<T>(code: i64, message: Option<String>) -> MetadataReply<T> {
    MetadataReply::Error {
        code,
        message: message.unwrap_or_else(|| format!("Last.fm error {}", code)),
    }
}

/// Extract names from `{"tag": [...]}`. A lone tag arrives as an object rather
/// than a one-element array, and an empty list sometimes arrives as `""`.
fn tag_names(tags: &Value) -> Vec<String> {
    let entries: Vec<&Value> = match tags.get("tag") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single @ Value::Object(_)) => vec![single],
        _ => Vec::new(),
    };

    entries
        .into_iter()
        .filter_map(|tag| tag.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}
