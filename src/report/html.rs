//! HTML export built from a template file.

use std::path::Path;

use super::ReportError;
use crate::models::{ResultSet, SearchResult};

/// Template shipped with the crate
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/report.html";

/// Literal token replaced by the rendered results
pub const RESULTS_MARKER: &str = "{{ results }}";

/// HTML-escape a string before inserting it into the report.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn render_result(index: usize, result: &SearchResult) -> String {
    let link = html_escape(&result.link);
    format!(
        concat!(
            "<div class=\"result\">",
            "<div class=\"index\">Result {index}</div>",
            "<h5>{title}</h5>",
            "<p>{description}</p>",
            "<a href=\"{link}\" target=\"_blank\" rel=\"noopener noreferrer\">{link}</a>",
            "</div>"
        ),
        index = index,
        title = html_escape(&result.title),
        description = html_escape(&result.description),
        link = link,
    )
}

/// Substitute the results into template text.
pub fn render_html(template: &str, results: &ResultSet) -> Option<String> {
    if !template.contains(RESULTS_MARKER) {
        return None;
    }

    let fragments: String = results
        .iter()
        .enumerate()
        .map(|(i, result)| render_result(i + 1, result))
        .collect();

    Some(template.replace(RESULTS_MARKER, &fragments))
}

/// Load `template`, fill in the results and write the document to `path`.
pub fn export_html(results: &ResultSet, template: &Path, path: &Path) -> Result<(), ReportError> {
    let template_text =
        std::fs::read_to_string(template).map_err(|source| ReportError::Io {
            path: template.to_path_buf(),
            source,
        })?;

    let document = render_html(&template_text, results).ok_or_else(|| {
        ReportError::MissingMarker {
            path: template.to_path_buf(),
        }
    })?;

    std::fs::write(path, document).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Exported {} results to HTML file {}",
        results.len(),
        path.display()
    );
    Ok(())
}
