//! Google Custom Search engine implementation.
//!
//! Uses the Custom Search JSON API, which pages results in blocks of ten
//! addressed by a 1-based `start` offset.
//! API documentation: https://developers.google.com/custom-search/v1/reference/rest/v1/cse/list

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Credentials;
use crate::models::SearchResult;
use crate::sources::{SearchEngine, SourceError};
use crate::utils::HttpClient;

pub const GOOGLE_SEARCH_API: &str = "https://www.googleapis.com/customsearch/v1";

/// Results the API returns per page (its maximum for `num`)
pub const RESULTS_PER_PAGE: u32 = 10;

/// Google Custom Search engine
///
/// Requires an API key and a programmable search engine id (`cx`).
#[derive(Debug, Clone)]
pub struct GoogleSearch {
    client: HttpClient,
    credentials: Credentials,
    base_url: String,
}

impl GoogleSearch {
    pub fn new(client: HttpClient, credentials: Credentials) -> Self {
        Self::with_base_url(client, credentials, GOOGLE_SEARCH_API)
    }

    /// Point the engine at a different endpoint (mirrors, test servers)
    pub fn with_base_url(
        client: HttpClient,
        credentials: Credentials,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            base_url: base_url.into(),
        }
    }

    /// Map a 1-based page index to the API's 1-based result offset.
    ///
    /// `None` for page 0 or when the offset does not fit in a `u32`.
    pub fn start_index(page: u32) -> Option<u32> {
        page.checked_sub(1)?
            .checked_mul(RESULTS_PER_PAGE)?
            .checked_add(1)
    }

    fn page_url(&self, query: &str, page: u32, lang: &str) -> Result<url::Url, SourceError> {
        let start = Self::start_index(page)
            .ok_or_else(|| SourceError::InvalidRequest(format!("Page {} is out of range", page)))?
            .to_string();
        let num = RESULTS_PER_PAGE.to_string();

        url::Url::parse_with_params(
            &self.base_url,
            [
                ("key", self.credentials.api_key.as_str()),
                ("cx", self.credentials.engine_id.as_str()),
                ("q", query),
                ("start", start.as_str()),
                ("num", num.as_str()),
                ("lr", lang),
            ],
        )
        .map_err(|e| SourceError::InvalidRequest(format!("Bad search endpoint: {}", e)))
    }
}

#[async_trait]
impl SearchEngine for GoogleSearch {
    fn id(&self) -> &str {
        "google"
    }

    fn name(&self) -> &str {
        "Google Custom Search"
    }

    async fn fetch_page(
        &self,
        query: &str,
        page: u32,
        lang: &str,
    ) -> Result<Vec<SearchResult>, SourceError> {
        let url = self.page_url(query, page, lang)?;

        tracing::debug!(page, query, "Requesting Google results page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to search Google: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(SourceError::Api(format!(
                "Google API returned status {} for page {}: {}",
                status, page, detail
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read Google response: {}", e)))?;

        let json: SearchResponse = serde_json::from_str(&body).map_err(|e| {
            SourceError::Parse(format!("Failed to parse Google response for page {}: {}", page, e))
        })?;

        Ok(json.items.into_iter().map(SearchResult::from).collect())
    }
}

/// Custom Search API response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    /// Absent when the page has no results
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    link: String,
}

impl From<SearchItem> for SearchResult {
    fn from(item: SearchItem) -> Self {
        SearchResult::new(item.title, item.snippet, item.link)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::DEFAULT_TIMEOUT;
    use mockito::Matcher;

    fn engine(base_url: String) -> GoogleSearch {
        GoogleSearch::with_base_url(
            HttpClient::new(DEFAULT_TIMEOUT).unwrap(),
            Credentials::new("test-key", "test-cx"),
            base_url,
        )
    }

    #[test]
    fn test_start_index() {
        assert_eq!(GoogleSearch::start_index(1), Some(1));
        assert_eq!(GoogleSearch::start_index(2), Some(11));
        assert_eq!(GoogleSearch::start_index(5), Some(41));
        assert_eq!(GoogleSearch::start_index(0), None);
        assert_eq!(GoogleSearch::start_index(u32::MAX), None);
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_unreachable_offset() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let engine = engine(format!("{}/customsearch/v1", server.url()));
        let err = engine.fetch_page("q", u32::MAX, "lang_es").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, SourceError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_sends_query_parameters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("key".into(), "test-key".into()),
                Matcher::UrlEncoded("cx".into(), "test-cx".into()),
                Matcher::UrlEncoded("q".into(), "filetype:pdf \"report\"".into()),
                Matcher::UrlEncoded("start".into(), "11".into()),
                Matcher::UrlEncoded("num".into(), "10".into()),
                Matcher::UrlEncoded("lr".into(), "lang_en".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "kind": "customsearch#search",
                    "items": [
                        {"title": "A", "snippet": "first", "link": "http://x/a.pdf"},
                        {"title": "B", "link": "http://x/b.txt"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let engine = engine(format!("{}/customsearch/v1", server.url()));
        let page = engine
            .fetch_page("filetype:pdf \"report\"", 2, "lang_en")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            page,
            vec![
                SearchResult::new("A", "first", "http://x/a.pdf"),
                SearchResult::new("B", "", "http://x/b.txt"),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_page_without_items_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"kind": "customsearch#search", "searchInformation": {"totalResults": "0"}}"#)
            .create_async()
            .await;

        let engine = engine(format!("{}/customsearch/v1", server.url()));
        let page = engine.fetch_page("nothing", 1, "lang_es").await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_page_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"code": 403, "message": "API key not valid"}}"#)
            .create_async()
            .await;

        let engine = engine(format!("{}/customsearch/v1", server.url()));
        let err = engine.fetch_page("q", 1, "lang_es").await.unwrap_err();

        match err {
            SourceError::Api(msg) => {
                assert!(msg.contains("403"));
                assert!(msg.contains("API key not valid"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/customsearch/v1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let engine = engine(format!("{}/customsearch/v1", server.url()));
        let err = engine.fetch_page("q", 1, "lang_es").await.unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
