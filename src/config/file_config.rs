//! Writing credentials back to the TOML configuration file.
//!
//! The file is created if it does not exist. Otherwise only the two keys of
//! the `[credentials]` table are replaced and every other section is kept:
//!
//! ```toml
//! [credentials]
//! api_key = "your-api-key"
//! engine_id = "your-search-engine-id"
//!
//! [downloads]
//! directory = "downloads"
//! ```

use std::path::Path;

use super::Credentials;

/// Create or update the `[credentials]` table of a configuration file
pub fn save_credentials(path: &Path, credentials: &Credentials) -> Result<(), ConfigFileError> {
    let mut document = if path.exists() {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigFileError::Io(format!("{}: {}", path.display(), e)))?;
        content
            .parse::<toml::Table>()
            .map_err(|e| ConfigFileError::Parse(format!("{}: {}", path.display(), e)))?
    } else {
        toml::Table::new()
    };

    // A scalar `credentials = ...` is replaced by a table.
    if !document.get("credentials").is_some_and(toml::Value::is_table) {
        document.insert(
            "credentials".to_string(),
            toml::Value::Table(toml::Table::new()),
        );
    }

    let table = document
        .get_mut("credentials")
        .and_then(toml::Value::as_table_mut)
        .ok_or_else(|| ConfigFileError::Serialize("credentials is not a table".to_string()))?;

    table.insert(
        "api_key".to_string(),
        toml::Value::String(credentials.api_key.clone()),
    );
    table.insert(
        "engine_id".to_string(),
        toml::Value::String(credentials.engine_id.clone()),
    );

    let content = toml::to_string_pretty(&document)
        .map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    std::fs::write(path, content)
        .map_err(|e| ConfigFileError::Io(format!("{}: {}", path.display(), e)))
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
