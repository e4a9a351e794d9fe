use async_trait::async_trait;
use serde::Deserialize;

use super::{HttpClient, ImageProvider};
use crate::error::SearchError;

const SERVICE: &str = "Giphy";

#[derive(Debug, Deserialize)]
struct GifSearchResponse {
    #[serde(default)]
    data: Vec<GifSearchResult>,
}

#[derive(Debug, Deserialize)]
struct GifSearchResult {
    images: Option<GifImages>,
}

#[derive(Debug, Deserialize)]
struct GifImages {
    original: Option<GifRendition>,
}

#[derive(Debug, Deserialize)]
struct GifRendition {
    url: Option<String>,
}

pub struct GiphyClient {
    api_key: String,
    http: HttpClient,
}

impl GiphyClient {
    pub fn new(api_key: String, http: HttpClient) -> Self {
        Self { api_key, http }
    }
}

#[async_trait]
impl ImageProvider for GiphyClient {
    async fn search(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<String>, SearchError> {
        let url = format!(
            "https://api.giphy.com/v1/gifs/search?api_key={}&q={}&limit={}&offset={}",
            self.api_key,
            urlencoding::encode(query),
            limit,
            offset
        );

        tracing::debug!("Searching Giphy for {:?} at offset {}", query, offset);

        let response = self.http.get(SERVICE, &url).await?;
        if !response.status().is_success() {
            return Err(SearchError::UpstreamStatus {
                service: SERVICE,
                status: response.status(),
            });
        }

        let body = response.text().await.map_err(|e| SearchError::Upstream {
            service: SERVICE,
            source: e.without_url(),
        })?;
        let parsed: GifSearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::MalformedResponse {
                service: SERVICE,
                reason: e.to_string(),
            })?;

        Ok(original_urls(parsed, limit))
    }
}

fn original_urls(response: GifSearchResponse, limit: u32) -> Vec<String> {
    response
        .data
        .into_iter()
        .filter_map(|gif| gif.images?.original?.url)
        .filter(|url| !url.is_empty())
        .take(limit as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_urls_skips_entries_without_url() {
        let body = r#"{
            "data": [
                {"id": "a", "images": {"original": {"url": "https://media.giphy.com/a.gif", "width": "480"}}},
                {"id": "b", "images": {"fixed_height": {"url": "https://media.giphy.com/b-small.gif"}}},
                {"id": "c", "images": {"original": {"url": ""}}},
                {"id": "d", "images": {"original": {"url": "https://media.giphy.com/d.gif"}}}
            ],
            "pagination": {"total_count": 4, "count": 4, "offset": 0}
        }"#;

        let parsed: GifSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            original_urls(parsed, 6),
            vec![
                "https://media.giphy.com/a.gif".to_string(),
                "https://media.giphy.com/d.gif".to_string(),
            ]
        );
    }

    #[test]
    fn test_original_urls_caps_at_limit() {
        let data: Vec<String> = (0..10)
            .map(|i| format!(r#"{{"images": {{"original": {{"url": "https://media.giphy.com/{}.gif"}}}}}}"#, i))
            .collect();
        let body = format!(r#"{{"data": [{}]}}"#, data.join(","));

        let parsed: GifSearchResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(original_urls(parsed, 6).len(), 6);
    }

    #[test]
    fn test_empty_result_list() {
        let parsed: GifSearchResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(original_urls(parsed, 6).is_empty());

        let parsed: GifSearchResponse = serde_json::from_str(r#"{"meta": {"status": 200}}"#).unwrap();
        assert!(original_urls(parsed, 6).is_empty());
    }
}
