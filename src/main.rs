use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gifcast::api::{self, AppState};
use gifcast::cache;
use gifcast::config::Config;
use gifcast::providers::{GiphyClient, HttpClient, LastFmClient};
use gifcast::render::Renderer;
use gifcast::search::SearchService;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gifcast=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load API keys and settings from .env if it exists
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;

    let store = cache::open_store(&config.cache)?;
    let http = HttpClient::new(&config.upstream)?;

    let search = SearchService::new(
        store,
        Arc::new(LastFmClient::new(config.lastfm_api_key.clone(), http.clone())),
        Arc::new(GiphyClient::new(config.giphy_api_key.clone(), http)),
    );

    tracing::info!("Serving templates from {}", config.templates_dir.display());
    let app = api::create_router(AppState {
        search,
        renderer: Renderer::new(config.templates_dir.clone()),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
