//! Terminal table output.

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::ResultSet;

/// Build the results table: `#`, title, description and link per row,
/// with an empty row between consecutive results.
pub fn render_table(results: &ResultSet) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        ["#", "Title", "Description", "Link"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold).fg(Color::Magenta)),
    );

    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            table.add_row(vec![""; 4]);
        }
        table.add_row(vec![
            Cell::new(i + 1).add_attribute(Attribute::Dim),
            Cell::new(&result.title),
            Cell::new(&result.description),
            Cell::new(&result.link),
        ]);
    }

    table
}

/// Print the results table to stdout.
pub fn print_table(results: &ResultSet) {
    println!("{}", render_table(results));
}
