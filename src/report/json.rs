//! JSON export.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ReportError;
use crate::models::ResultSet;

/// Write the results as an indented JSON array.
///
/// Output is UTF-8 with non-ASCII characters written as-is and four-space
/// indentation.
pub fn export_json(results: &ResultSet, path: &Path) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    results.results().serialize(&mut serializer)?;

    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;

    tracing::info!(
        "Exported {} results to JSON file {}",
        results.len(),
        path.display()
    );
    Ok(())
}
