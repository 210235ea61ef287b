//! GNews search API client.
//!
//! One bounded request per (query, window) pair, with a fixed minimum
//! interval between successive calls. The provider's rate limit is global
//! across windows, so the pacing lives here in the client rather than in
//! any one fetch pass.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use news_core::{NewsSearch, RawArticle, TimeWindow, UpstreamError};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

const BASE_URL: &str = "https://gnews.io/api/v4";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);
const DEFAULT_INTER_CALL_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_MAX_ARTICLES: u32 = 3;

/// Enforces a minimum interval between successive upstream calls.
struct CallPacer {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl CallPacer {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Mutex::new(None),
            min_interval,
        }
    }

    async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

pub struct GNewsClient {
    api_key: String,
    client: Client,
    base_url: String,
    max_articles: u32,
    pacer: CallPacer,
}

impl GNewsClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Override the API endpoint (tests point this at a local mock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            client,
            base_url,
            max_articles: DEFAULT_MAX_ARTICLES,
            pacer: CallPacer::new(DEFAULT_INTER_CALL_DELAY),
        }
    }

    /// Cap on articles returned per call. Free-tier GNews caps this low.
    pub fn with_max_articles(mut self, max_articles: u32) -> Self {
        self.max_articles = max_articles;
        self
    }

    /// Minimum interval between successive calls.
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.pacer = CallPacer::new(min_interval);
        self
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<SearchArticle>,
}

/// Raw upstream article. Field names vary across provider versions: the
/// URL arrives as `url` or `link`, the summary as `description` or
/// `content`.
#[derive(Debug, Deserialize)]
struct SearchArticle {
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: String,
}

impl SearchArticle {
    /// Collapse the field-name variants into one shape. Articles without a
    /// usable link or timestamp are dropped.
    fn normalize(self) -> Option<RawArticle> {
        let link = self.link.or(self.url)?;
        let published_at = DateTime::parse_from_rfc3339(&self.published_at)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()?;

        Some(RawArticle {
            title: self.title,
            link,
            snippet: self.description.or(self.content),
            published_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Vec<String>>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        if let Some(message) = self.message {
            return Some(message);
        }
        self.errors.map(|errors| errors.join("; "))
    }
}

#[async_trait]
impl NewsSearch for GNewsClient {
    async fn search(
        &self,
        query: &str,
        window: TimeWindow,
    ) -> Result<Vec<RawArticle>, UpstreamError> {
        self.pacer.acquire().await;

        let url = format!("{}/search", self.base_url);
        let max = self.max_articles.to_string();
        let from = window.from.to_rfc3339();
        let to = window.to.to_rfc3339();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("lang", "en"),
                ("country", "us"),
                ("max", max.as_str()),
                ("from", from.as_str()),
                ("to", to.as_str()),
                ("apikey", self.api_key.as_str()),
                ("sortby", "publishedAt"),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            return Err(UpstreamError {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body: SearchResponse = response.json().await.map_err(|e| UpstreamError {
            status: None,
            message: format!("malformed response: {e}"),
        })?;

        let dropped = body
            .articles
            .iter()
            .filter(|a| a.link.is_none() && a.url.is_none())
            .count();
        if dropped > 0 {
            tracing::debug!(dropped, "articles without a link in upstream response");
        }

        Ok(body
            .articles
            .into_iter()
            .filter_map(SearchArticle::normalize)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use httpmock::{Method::GET, MockServer};
    use serde_json::json;

    fn window() -> TimeWindow {
        TimeWindow {
            from: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2025, 3, 31, 23, 59, 59).unwrap(),
        }
    }

    fn client_for(server: &MockServer) -> GNewsClient {
        GNewsClient::with_base_url("test-key".to_string(), server.base_url())
            .with_min_interval(Duration::from_millis(0))
    }

    #[tokio::test]
    async fn test_normalizes_both_field_name_variants() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "Apple")
                .query_param("apikey", "test-key");
            then.status(200).json_body(json!({
                "articles": [
                    {
                        "title": "Modern shape",
                        "url": "https://example.com/a",
                        "description": "modern snippet",
                        "publishedAt": "2025-02-01T09:00:00Z"
                    },
                    {
                        "title": "Legacy shape",
                        "link": "https://example.com/b",
                        "content": "legacy snippet",
                        "publishedAt": "2025-02-02T09:00:00Z"
                    }
                ]
            }));
        });

        let articles = client_for(&server)
            .search("Apple", window())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].link, "https://example.com/a");
        assert_eq!(articles[0].snippet.as_deref(), Some("modern snippet"));
        assert_eq!(articles[1].link, "https://example.com/b");
        assert_eq!(articles[1].snippet.as_deref(), Some("legacy snippet"));
    }

    #[tokio::test]
    async fn test_drops_articles_without_link_or_timestamp() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!({
                "articles": [
                    { "title": "No link", "publishedAt": "2025-02-01T09:00:00Z" },
                    { "title": "Bad time", "url": "https://example.com/x", "publishedAt": "yesterday" },
                    { "title": "Good", "url": "https://example.com/y", "publishedAt": "2025-02-03T09:00:00Z" }
                ]
            }));
        });

        let articles = client_for(&server)
            .search("Apple", window())
            .await
            .unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Good");
    }

    #[tokio::test]
    async fn test_429_maps_to_quota_exhaustion() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(429).json_body(json!({
                "errors": ["You have reached your daily quota."]
            }));
        });

        let err = client_for(&server)
            .search("Apple", window())
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(429));
        assert!(err.quota_exhausted());
    }

    #[tokio::test]
    async fn test_403_with_limit_message_maps_to_quota_exhaustion() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(403).json_body(json!({
                "message": "request limit reached, upgrade your plan"
            }));
        });

        let err = client_for(&server)
            .search("Apple", window())
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(403));
        assert!(err.quota_exhausted());
        assert!(err.message.contains("limit"));
    }

    #[tokio::test]
    async fn test_server_error_is_not_quota_exhaustion() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(500).body("oops");
        });

        let err = client_for(&server)
            .search("Apple", window())
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(500));
        assert!(!err.quota_exhausted());
    }

    #[tokio::test]
    async fn test_pacer_spaces_out_successive_calls() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(json!({ "articles": [] }));
        });

        let client = GNewsClient::with_base_url("test-key".to_string(), server.base_url())
            .with_min_interval(Duration::from_millis(100));

        let start = std::time::Instant::now();
        client.search("Apple", window()).await.unwrap();
        client.search("Apple", window()).await.unwrap();

        assert!(
            start.elapsed() >= Duration::from_millis(100),
            "second call must wait out the inter-call interval"
        );
    }
}
