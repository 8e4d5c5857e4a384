//! Search result model shared by every output format.

use serde::{Deserialize, Serialize};

/// A single search hit as returned by the search API
///
/// Serialized with exactly the keys `title`, `description` and `link`,
/// which is the shape of the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    pub title: String,

    /// Snippet shown under the title
    pub description: String,

    /// Target URL
    pub link: String,
}

impl SearchResult {
    /// Create a new search result
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: link.into(),
        }
    }
}

/// Ordered results of one query run, page by page in API order
///
/// No sorting or deduplication is ever applied; the same link may
/// appear more than once if the API returned it on several pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    query: String,
    results: Vec<SearchResult>,
}

impl ResultSet {
    /// Create an empty result set for a query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
        }
    }

    /// Build a result set from already collected results
    pub fn from_results(query: impl Into<String>, results: Vec<SearchResult>) -> Self {
        Self {
            query: query.into(),
            results,
        }
    }

    /// Append one page of results, keeping their order
    pub fn extend_page(&mut self, page: Vec<SearchResult>) {
        self.results.extend(page);
    }

    /// The query these results answer
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.results.iter()
    }

    /// Links of every result, in order
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.link.as_str())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a SearchResult;
    type IntoIter = std::slice::Iter<'a, SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
