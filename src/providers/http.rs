use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::error::SearchError;

/// Shared HTTP plumbing for the upstream clients.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    retries: u32,
    retry_delay: Duration,
}

impl HttpClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(config.timeout).build()?,
            retries: config.retries,
            retry_delay: config.retry_delay,
        })
    }

    /// GET `url`, retrying network failures and 5xx answers up to the
    /// configured number of times.
    pub async fn get(
        &self,
        service: &'static str,
        url: &str,
    ) -> Result<reqwest::Response, SearchError> {
        let mut attempt = 0;

        loop {
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_server_error() && attempt < self.retries => {
                    tracing::warn!(
                        "{} returned HTTP {}, retrying ({}/{})",
                        service,
                        response.status(),
                        attempt + 1,
                        self.retries
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.retries => {
                    tracing::warn!(
                        "{} request failed: {}, retrying ({}/{})",
                        service,
                        e.without_url(),
                        attempt + 1,
                        self.retries
                    );
                }
                Err(e) => {
                    return Err(SearchError::Upstream {
                        service,
                        source: e.without_url(),
                    })
                }
            }

            attempt += 1;
            tokio::time::sleep(self.retry_delay).await;
        }
    }
}
