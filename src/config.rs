use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    /// One JSON file per cache key.
    File { dir: PathBuf },
    Sqlite { path: PathBuf },
    Memory,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Entries older than this are treated as missing. `None` keeps them forever.
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub timeout: Duration,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            retries: 0,
            retry_delay: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub lastfm_api_key: String,
    pub giphy_api_key: String,
    pub templates_dir: PathBuf,
    pub cache: CacheConfig,
    pub upstream: UpstreamConfig,
}

impl Config {
    /// Read configuration from the process environment. Call `dotenvy::dotenv()`
    /// first so a local `.env` file is taken into account.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lastfm_api_key = lookup("LASTFM_API_KEY").unwrap_or_default();
        let giphy_api_key = lookup("GIPHY_API_KEY").unwrap_or_default();
        if lastfm_api_key.is_empty() {
            tracing::warn!("LASTFM_API_KEY is not set, metadata lookups will fail");
        }
        if giphy_api_key.is_empty() {
            tracing::warn!("GIPHY_API_KEY is not set, image searches will fail");
        }

        let backend = match lookup("CACHE_BACKEND").as_deref().unwrap_or("file") {
            "file" => CacheBackend::File {
                dir: lookup("CACHE_DIR")
                    .unwrap_or_else(|| "cache".to_string())
                    .into(),
            },
            "sqlite" => CacheBackend::Sqlite {
                path: lookup("CACHE_DB_PATH")
                    .unwrap_or_else(|| "cache.db".to_string())
                    .into(),
            },
            "memory" => CacheBackend::Memory,
            other => bail!("Unknown CACHE_BACKEND: {}", other),
        };

        let ttl_hours: u64 = parse_or(&lookup, "CACHE_TTL_HOURS", 0);
        let defaults = UpstreamConfig::default();

        Ok(Self {
            port: parse_or(&lookup, "PORT", 3000),
            lastfm_api_key,
            giphy_api_key,
            templates_dir: lookup("TEMPLATES_DIR")
                .unwrap_or_else(|| "templates".to_string())
                .into(),
            cache: CacheConfig {
                backend,
                ttl: (ttl_hours > 0)
                    .then(|| Duration::from_secs(ttl_hours.saturating_mul(60 * 60))),
            },
            upstream: UpstreamConfig {
                timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "UPSTREAM_TIMEOUT_SECS",
                    defaults.timeout.as_secs(),
                )),
                retries: parse_or(&lookup, "UPSTREAM_RETRIES", defaults.retries),
                retry_delay: Duration::from_millis(parse_or(
                    &lookup,
                    "UPSTREAM_RETRY_DELAY_MS",
                    defaults.retry_delay.as_millis() as u64,
                )),
            },
        })
    }
}

fn parse_or<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value {:?} for {}, using {}", raw, name, default);
            default
        }),
        None => default,
    }
}
