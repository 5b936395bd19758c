//! Transposed per-column summary: one line per column with its type, level
//! and a short data preview.

use af_columnar::Table;
use log::debug;

use crate::classify::group_line;
use crate::config::SummaryLimits;
use crate::preview::column_preview;
use crate::text::{Align, digits, display_width, key_literal, pad, plural, shape_line};

struct SummaryRow {
    key: String,
    type_name: &'static str,
    level: String,
    preview: String,
}

#[must_use]
pub fn render_summary(table: &Table, limits: &SummaryLimits) -> String {
    let column_count = table.column_count();
    let header = shape_line(table.row_count(), column_count);
    if column_count == 0 {
        return format!("{header}\n");
    }

    let shown = limits.limit.shown(column_count);
    // Widths cover every column, listed or not.
    let rows: Vec<SummaryRow> = table
        .columns()
        .map(|(key, column)| {
            let (level, preview) = column_preview(column, limits);
            SummaryRow {
                key: key_literal(key),
                type_name: column.dtype().name(),
                level: level.to_string(),
                preview,
            }
        })
        .collect();

    let dtypes: Vec<_> = table.columns().map(|(_, column)| column.dtype()).collect();
    let position_width = digits(column_count);
    let key_width = rows
        .iter()
        .map(|row| display_width(&row.key))
        .chain([3])
        .max()
        .unwrap_or(3);
    let type_width = rows
        .iter()
        .map(|row| row.type_name.len())
        .chain([4])
        .max()
        .unwrap_or(4);
    let level_width = rows
        .iter()
        .map(|row| row.level.len())
        .chain([5])
        .max()
        .unwrap_or(5);

    let mut lines = vec![header, group_line(&dtypes)];
    lines.push(format!(
        "{} {} {} {} data_preview",
        pad("#", position_width, Align::Left),
        pad("key", key_width, Align::Left),
        pad("type", type_width, Align::Left),
        pad("level", level_width, Align::Right),
    ));
    for (position, row) in rows.iter().take(shown).enumerate() {
        lines.push(format!(
            "{} {} {} {} {}",
            pad(&position.to_string(), position_width, Align::Left),
            pad(&row.key, key_width, Align::Left),
            pad(row.type_name, type_width, Align::Left),
            pad(&row.level, level_width, Align::Right),
            row.preview,
        ));
    }

    let remaining = column_count - shown;
    if remaining > 0 {
        debug!("summary truncated: {remaining} of {column_count} columns omitted");
        lines.push(format!(
            " ... {remaining} more {} ...",
            plural("Vector", remaining)
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
