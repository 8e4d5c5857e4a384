//! Core data models for search queries and their results.

mod result;
mod search;

pub use result::{ResultSet, SearchResult};
pub use search::{SearchQuery, DEFAULT_LANG};
