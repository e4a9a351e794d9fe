use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Everything that can stop a search from producing a page.
///
/// Rejections use 404 regardless of cause; existing clients rely on it.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Artist name is required")]
    MissingArtist,

    /// The metadata provider answered with its own error payload.
    #[error("{message}")]
    Provider { code: i64, message: String },

    #[error("Artist mismatch: requested \"{requested}\" but found \"{found}\"")]
    NameMismatch { requested: String, found: String },

    #[error("\"{name}\" has {listeners} listeners, at least {threshold} are required")]
    NotPopular {
        name: String,
        listeners: u64,
        threshold: u64,
    },

    #[error("Failed to load page template: {0}")]
    Template(#[source] std::io::Error),

    #[error("{service} request failed: {source}")]
    Upstream {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}")]
    UpstreamStatus {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{service} returned an unexpected response: {reason}")]
    MalformedResponse {
        service: &'static str,
        reason: String,
    },
}

impl SearchError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::MissingArtist
            | SearchError::Provider { .. }
            | SearchError::NameMismatch { .. }
            | SearchError::NotPopular { .. } => StatusCode::NOT_FOUND,
            SearchError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SearchError::Upstream { source, .. } if source.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            SearchError::Upstream { .. }
            | SearchError::UpstreamStatus { .. }
            | SearchError::MalformedResponse { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Search failed: {}", self);
        } else {
            tracing::info!("Search rejected: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
