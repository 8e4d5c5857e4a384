//! Search engine backends and the paginated search workflow.
//!
//! This module defines the [`SearchEngine`] trait that fetches a single page of
//! results, and [`search`], which drives an engine across the requested page
//! range and aggregates everything into one [`ResultSet`].
//!
//! # Pagination
//!
//! Pages are requested strictly one after another, starting at
//! `query.start_page` and covering `query.pages` pages. Results are appended
//! in page order, then in the order the API returned them within a page.
//!
//! A failure on any page aborts the whole search. Results already fetched
//! from earlier pages are dropped and the error is returned to the caller.
//!
//! ```rust,no_run
//! use ninjadorks::config::Credentials;
//! use ninjadorks::models::SearchQuery;
//! use ninjadorks::sources::{search, GoogleSearch};
//! use ninjadorks::utils::{HttpClient, DEFAULT_TIMEOUT};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = Credentials::new("api-key", "engine-id");
//! let engine = GoogleSearch::new(HttpClient::new(DEFAULT_TIMEOUT)?, credentials);
//! let results = search(&engine, &SearchQuery::new("filetype:pdf").pages(2)).await?;
//! println!("{} results", results.len());
//! # Ok(())
//! # }
//! ```

mod google;
pub mod mock;

pub use google::{GoogleSearch, GOOGLE_SEARCH_API, RESULTS_PER_PAGE};
pub use mock::MockEngine;

use crate::models::{ResultSet, SearchQuery, SearchResult};
use async_trait::async_trait;

/// A search API that can return one page of results at a time.
///
/// # Implementing a New Engine
///
/// Implement [`fetch_page`](SearchEngine::fetch_page) for a 1-based page
/// index. Map the API's own paging scheme (offsets, cursors) inside the
/// implementation; [`search`] only ever deals in page numbers.
#[async_trait]
pub trait SearchEngine: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this engine (e.g. "google")
    fn id(&self) -> &str;

    /// Human-readable name of this engine
    fn name(&self) -> &str;

    /// Fetch one page of results for `query`, filtered by locale `lang`
    async fn fetch_page(
        &self,
        query: &str,
        page: u32,
        lang: &str,
    ) -> Result<Vec<SearchResult>, SourceError>;
}

/// Run a paginated search and aggregate all pages in order.
///
/// Issues exactly `query.pages` requests. Returns
/// [`SourceError::InvalidRequest`] without touching the network when the
/// query fails validation.
pub async fn search(
    engine: &dyn SearchEngine,
    query: &SearchQuery,
) -> Result<ResultSet, SourceError> {
    query.validate().map_err(SourceError::InvalidRequest)?;

    let mut results = ResultSet::new(&query.query);

    for page in query.page_range() {
        tracing::debug!(
            engine = engine.id(),
            page,
            lang = %query.lang,
            "Fetching result page"
        );

        let items = engine.fetch_page(&query.query, page, &query.lang).await?;

        tracing::debug!(engine = engine.id(), page, count = items.len(), "Page fetched");
        results.extend_page(items);
    }

    tracing::info!(
        "Search on {} returned {} results over {} page(s)",
        engine.name(),
        results.len(),
        query.pages
    );

    Ok(results)
}

/// Errors that can occur when talking to a search engine
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The API answered with a non-success status
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
