use axum::{
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::SearchError;
use crate::models::SearchRequest;
use crate::render::Renderer;
use crate::search::SearchService;

pub struct AppState {
    pub search: SearchService,
    pub renderer: Renderer,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SearchParams {
    artist: Option<String>,
    track: Option<String>,
}

impl SearchParams {
    /// Read `artist` and `track` from the query string. When a parameter is
    /// repeated the first occurrence wins; unrelated parameters are ignored.
    pub fn from_uri(uri: &Uri) -> Self {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();

        let mut params = Self::default();
        for (name, value) in pairs {
            match name.as_str() {
                "artist" if params.artist.is_none() => params.artist = Some(value),
                "track" if params.track.is_none() => params.track = Some(value),
                _ => {}
            }
        }
        params
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .fallback(dispatch_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn root_handler() -> Html<&'static str> {
    Html(include_str!("../../templates/index.html"))
}

/// Any GET whose path starts with `/search` is a search (`/search`,
/// `/search/`, `/search/results`, `/searchx`). Everything else is not found.
async fn dispatch_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method == Method::GET && uri.path().starts_with("/search") {
        search_handler(&state, &uri).await.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}

async fn search_handler(state: &AppState, uri: &Uri) -> Result<Html<String>, SearchError> {
    let params = SearchParams::from_uri(uri);
    let request = SearchRequest::from_params(params.artist.as_deref(), params.track.as_deref())?;
    let record = state.search.search(&request).await?;
    let page = state.renderer.render(&record).await?;
    Ok(Html(page))
}
