use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Key component used in place of the track name for artist-only searches.
const ARTIST_ONLY_SENTINEL: &str = "artist";

/// Replacement for every character outside `[a-z0-9]` in a cache key.
const KEY_SEPARATOR: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Artist,
    Track,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Artist => "artist",
            SearchMode::Track => "track",
        }
    }

    /// Upper bound (exclusive) of the random pagination offset used for the
    /// image search. Track searches stay close to the top results.
    pub fn random_limit(&self) -> u32 {
        match self {
            SearchMode::Artist => 50,
            SearchMode::Track => 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub artist: String,
    pub track: Option<String>,
}

impl SearchRequest {
    pub fn artist(name: String) -> Self {
        Self {
            artist: name,
            track: None,
        }
    }

    pub fn track(artist: String, track: String) -> Self {
        Self {
            artist,
            track: Some(track),
        }
    }

    /// Build a request from raw query parameters. Surrounding whitespace is
    /// ignored and an empty track counts as no track.
    pub fn from_params(artist: Option<&str>, track: Option<&str>) -> Result<Self, SearchError> {
        let artist = artist
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(SearchError::MissingArtist)?;

        match track.map(str::trim).filter(|t| !t.is_empty()) {
            Some(track) => Ok(Self::track(artist.to_string(), track.to_string())),
            None => Ok(Self::artist(artist.to_string())),
        }
    }

    pub fn mode(&self) -> SearchMode {
        if self.track.is_some() {
            SearchMode::Track
        } else {
            SearchMode::Artist
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::from_request(self)
    }
}

/// Filesystem-safe identifier of a search. Distinct requests may collide when
/// they sanitize to the same string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn from_request(request: &SearchRequest) -> Self {
        let track = request.track.as_deref().unwrap_or(ARTIST_ONLY_SENTINEL);
        let raw = format!("{}{}{}", request.artist, KEY_SEPARATOR, track).to_lowercase();

        let sanitized = raw
            .chars()
            .map(|c| {
                if c.is_ascii_lowercase() || c.is_ascii_digit() {
                    c
                } else {
                    KEY_SEPARATOR
                }
            })
            .collect();

        CacheKey(sanitized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
