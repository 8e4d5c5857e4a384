//! Rendering and exporting search results.
//!
//! - [`render_table`] / [`print_table`]: terminal table, one row per result
//! - [`export_json`]: JSON array of `{title, description, link}` objects
//! - [`export_html`]: results substituted into an HTML template
//!
//! Exporters overwrite the destination file if it already exists.

mod html;
mod json;
mod table;

pub use html::{export_html, render_html, DEFAULT_TEMPLATE_PATH, RESULTS_MARKER};
pub use json::export_json;
pub use table::{print_table, render_table};

use std::path::PathBuf;

/// Errors that can occur while exporting results
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("HTML template {} has no `{}` marker", path.display(), RESULTS_MARKER)]
    MissingMarker { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}
