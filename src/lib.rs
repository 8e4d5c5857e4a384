//! # NinjaDorks
//!
//! Run Google dork queries through the Custom Search JSON API, show the
//! results in the terminal, export them to JSON or HTML and download the
//! linked files. A separate generator turns plain-language descriptions into
//! dork queries with a local language model.
//!
//! ## Architecture
//!
//! - [`models`]: Search query and result types
//! - [`sources`]: Search engine trait, the Google engine and paginated search
//! - [`report`]: Console table, JSON and HTML exports
//! - [`download`]: Extension-filtered bulk file downloader
//! - [`generator`]: Few-shot dork generation against an Ollama server
//! - [`config`]: Layered configuration and credential setup
//! - [`ui`]: Status icons and spinner
//! - [`utils`]: Shared HTTP client

pub mod config;
pub mod download;
pub mod generator;
pub mod models;
pub mod report;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use download::{DownloadReport, ExtensionFilter, FileDownloader};
pub use generator::DorkGenerator;
pub use models::{ResultSet, SearchQuery, SearchResult};
pub use sources::{search, GoogleSearch, SearchEngine};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
