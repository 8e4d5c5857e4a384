//! Configuration management.
//!
//! Settings are layered from the TOML configuration file (if present) and
//! `NINJADORKS_`-prefixed environment variables, with nested keys separated by
//! a double underscore:
//!
//! ```text
//! NINJADORKS_CREDENTIALS__API_KEY=...
//! NINJADORKS_CREDENTIALS__ENGINE_ID=...
//! NINJADORKS_HTTP__TIMEOUT_SECS=60
//! ```
//!
//! Command-line flags are applied on top by the binaries.

mod file_config;
mod setup;

pub use file_config::{save_credentials, ConfigFileError};
pub use setup::{prompt_credentials, run_setup};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration file looked up in the working directory by default
pub const DEFAULT_CONFIG_FILE: &str = "ninjadorks.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "NINJADORKS";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Search API credentials
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Search endpoint settings
    #[serde(default)]
    pub search: SearchConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Download settings
    #[serde(default)]
    pub downloads: DownloadConfig,

    /// Report export settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Local language model settings
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// The API key pair needed to query the search API
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub engine_id: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, engine_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }
}

// Keep the key out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("engine_id", &self.engine_id)
            .finish()
    }
}

/// Credentials as read from file/environment, possibly incomplete
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub engine_id: Option<String>,
}

impl CredentialsConfig {
    /// Both keys present and non-blank, or an error naming what is missing
    pub fn resolve(&self) -> Result<Credentials, ConfigError> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (present(&self.api_key), present(&self.engine_id)) {
            (Some(api_key), Some(engine_id)) => Ok(Credentials { api_key, engine_id }),
            (None, Some(_)) => Err(ConfigError::MissingCredentials("api_key".to_string())),
            (Some(_), None) => Err(ConfigError::MissingCredentials("engine_id".to_string())),
            (None, None) => Err(ConfigError::MissingCredentials(
                "api_key, engine_id".to_string(),
            )),
        }
    }
}

/// Search endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Custom Search API endpoint
    #[serde(default = "default_search_url")]
    pub base_url: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_url(),
        }
    }
}

fn default_search_url() -> String {
    crate::sources::GOOGLE_SEARCH_API.to_string()
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Total timeout per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// Download configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory downloaded files are written to
    #[serde(default = "default_download_dir")]
    pub directory: PathBuf,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: default_download_dir(),
        }
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(crate::download::DEFAULT_DOWNLOAD_DIR)
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// HTML template containing the results marker
    #[serde(default = "default_html_template")]
    pub html_template: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            html_template: default_html_template(),
        }
    }
}

fn default_html_template() -> PathBuf {
    PathBuf::from(crate::report::DEFAULT_TEMPLATE_PATH)
}

/// Local language model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base URL of the Ollama-compatible server
    #[serde(default = "default_generator_endpoint")]
    pub endpoint: String,

    /// Model name to run
    #[serde(default = "default_generator_model")]
    pub model: String,

    /// Generation can be slow on CPU-only hosts
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generator_endpoint(),
            model: default_generator_model(),
            timeout_secs: default_generator_timeout(),
        }
    }
}

fn default_generator_endpoint() -> String {
    crate::generator::DEFAULT_ENDPOINT.to_string()
}

fn default_generator_model() -> String {
    crate::generator::DEFAULT_MODEL.to_string()
}

fn default_generator_timeout() -> u64 {
    300
}

/// Load configuration from a file (optional) and the environment
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let settings = ::config::Config::builder()
        .add_source(
            ::config::File::from(path)
                .format(::config::FileFormat::Toml)
                .required(false),
        )
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Missing credentials: {0}. Run with --configure to set them up")]
    MissingCredentials(String),

    #[error(transparent)]
    File(#[from] ConfigFileError),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}
