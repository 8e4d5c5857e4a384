//! Utility modules shared by the search, download and generator components.
//!
//! - [`HttpClient`]: reqwest client with user agent and connect/total timeouts
//!
//! ```rust,no_run
//! use ninjadorks::utils::{HttpClient, DEFAULT_TIMEOUT};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(DEFAULT_TIMEOUT)?;
//! let response = client.get("https://example.com").send().await?;
//! # Ok(())
//! # }
//! ```

mod http;

pub use http::{HttpClient, DEFAULT_TIMEOUT};
