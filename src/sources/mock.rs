//! Mock engine for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::models::SearchResult;
use crate::sources::{SearchEngine, SourceError};

/// One recorded `fetch_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCall {
    pub query: String,
    pub page: u32,
    pub lang: String,
}

/// A mock engine that replays queued pages and records every call.
///
/// Pages are handed out in the order they were pushed. Once the queue is
/// empty every further call returns an empty page.
#[derive(Debug, Default)]
pub struct MockEngine {
    responses: Mutex<VecDeque<Result<Vec<SearchResult>, SourceError>>>,
    calls: Mutex<Vec<PageCall>>,
}

impl MockEngine {
    /// Create a new mock engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a page of results.
    pub fn push_page(&self, page: Vec<SearchResult>) {
        self.lock_responses().push_back(Ok(page));
    }

    /// Queue a failing page.
    pub fn push_error(&self, error: SourceError) {
        self.lock_responses().push_back(Err(error));
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<PageCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_responses(
        &self,
    ) -> std::sync::MutexGuard<'_, VecDeque<Result<Vec<SearchResult>, SourceError>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SearchEngine for MockEngine {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Engine"
    }

    async fn fetch_page(
        &self,
        query: &str,
        page: u32,
        lang: &str,
    ) -> Result<Vec<SearchResult>, SourceError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(PageCall {
                query: query.to_string(),
                page,
                lang: lang.to_string(),
            });

        self.lock_responses().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
