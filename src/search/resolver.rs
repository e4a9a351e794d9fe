use crate::error::SearchError;
use crate::models::{PartialRecord, SearchMode, SearchRequest};
use crate::providers::{ArtistInfo, MetadataProvider, MetadataReply, TrackInfo};

/// Subjects with fewer listeners than this are rejected; image searches for
/// them return mostly unrelated GIFs.
pub const MIN_LISTENERS: u64 = 100_000;

/// Look up `request` with the metadata provider, validate the match and
/// derive the display fields.
pub async fn resolve_metadata(
    provider: &dyn MetadataProvider,
    request: &SearchRequest,
) -> Result<PartialRecord, SearchError> {
    match &request.track {
        Some(track) => {
            let info = found(provider.track_info(&request.artist, track).await?)?;
            check_match(&request.artist, &info.artist, info.listeners)?;
            Ok(from_track(info))
        }
        None => {
            let info = found(provider.artist_info(&request.artist).await?)?;
            check_match(&request.artist, &info.name, info.listeners)?;
            Ok(from_artist(info))
        }
    }
}

fn found<T>(reply: MetadataReply<T>) -> Result<T, SearchError> {
    match reply {
        MetadataReply::Found(info) => Ok(info),
        MetadataReply::Error { code, message } => Err(SearchError::Provider { code, message }),
    }
}

/// The provider answers with its closest match, which may be a different
/// artist altogether. Also applies the popularity filter.
pub fn check_match(requested: &str, found: &str, listeners: u64) -> Result<(), SearchError> {
    if found.to_lowercase() != requested.to_lowercase() {
        return Err(SearchError::NameMismatch {
            requested: requested.to_string(),
            found: found.to_string(),
        });
    }

    if listeners < MIN_LISTENERS {
        return Err(SearchError::NotPopular {
            name: found.to_string(),
            listeners,
            threshold: MIN_LISTENERS,
        });
    }

    Ok(())
}

pub fn from_artist(info: ArtistInfo) -> PartialRecord {
    PartialRecord {
        tags: info.tags.join(", "),
        search_q: info.name.clone(),
        subtitle: "Artist Profile".to_string(),
        title: info.name,
        random_limit: SearchMode::Artist.random_limit(),
    }
}

pub fn from_track(info: TrackInfo) -> PartialRecord {
    let tags = info.tags.join(", ");
    let tags = match &info.published {
        Some(date) => format!("Released: {} | Tags: {}", date, tags),
        None => tags,
    };

    PartialRecord {
        search_q: format!("{} {}", info.artist, info.name),
        subtitle: format!("Song by {}", info.artist),
        title: info.name,
        tags,
        random_limit: SearchMode::Track.random_limit(),
    }
}
