//! Search request model.

use serde::{Deserialize, Serialize};

/// Default locale filter passed to the search API
pub const DEFAULT_LANG: &str = "lang_es";

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Dork or plain query string
    pub query: String,

    /// First page to request (1-based)
    pub start_page: u32,

    /// Number of pages to request
    pub pages: u32,

    /// Locale filter, e.g. `lang_es` or `lang_en`
    pub lang: String,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            start_page: 1,
            pages: 1,
            lang: DEFAULT_LANG.to_string(),
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Set the first page
    pub fn start_page(mut self, page: u32) -> Self {
        self.start_page = page;
        self
    }

    /// Set the number of pages
    pub fn pages(mut self, pages: u32) -> Self {
        self.pages = pages;
        self
    }

    /// Set the locale filter
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Page indices this query covers, in request order.
    ///
    /// Only exact for a query that passed [`validate`](Self::validate).
    pub fn page_range(&self) -> std::ops::Range<u32> {
        self.start_page..self.start_page.saturating_add(self.pages)
    }

    /// Check the query before any request is made
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("query must not be empty".to_string());
        }
        if self.start_page < 1 {
            return Err(format!("start page must be >= 1 (got {})", self.start_page));
        }
        if self.pages < 1 {
            return Err(format!("pages must be >= 1 (got {})", self.pages));
        }
        if self.start_page.checked_add(self.pages).is_none() {
            return Err(format!(
                "page range {} + {} is out of bounds",
                self.start_page, self.pages
            ));
        }
        Ok(())
    }
}
