//! Interactive credential setup.

use inquire::validator::ValueRequiredValidator;
use inquire::{Password, PasswordDisplayMode, Text};
use owo_colors::OwoColorize;
use std::path::Path;

use super::{save_credentials, ConfigError, Credentials};
use crate::ui::{status_icon, Status};

/// Ask for the API key and search engine id on the terminal
pub fn prompt_credentials() -> Result<Credentials, ConfigError> {
    let api_key = Password::new("Google API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_validator(ValueRequiredValidator::default())
        .prompt()
        .map_err(|e| ConfigError::Prompt(e.to_string()))?;

    let engine_id = Text::new("Custom search engine ID (cx):")
        .with_validator(ValueRequiredValidator::default())
        .prompt()
        .map_err(|e| ConfigError::Prompt(e.to_string()))?;

    Ok(Credentials::new(api_key.trim(), engine_id.trim()))
}

/// Prompt for credentials and store them in the configuration file
pub fn run_setup(path: &Path) -> Result<Credentials, ConfigError> {
    let credentials = prompt_credentials()?;
    save_credentials(path, &credentials)?;

    tracing::info!("Credentials written to {}", path.display());
    println!(
        "{} Configuration saved to {}",
        status_icon(Status::Success).green().bold(),
        path.display()
    );

    Ok(credentials)
}
