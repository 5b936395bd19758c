use af_columnar::Table;

use crate::config::{DisplayOptions, RenderMode, SummaryLimits, default_render_mode};
use crate::html::render_html;
use crate::summary::render_summary;
use crate::table::render_table;
use crate::text::shape_line;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";

const EMPTY_PAIR_TEXT: &str = "(empty DataFrame)";

/// Rows at or below which the display pair turns summary tallies off.
const SHORT_FRAME_ROWS: usize = 5;

#[must_use]
pub fn render_minimal(table: &Table) -> String {
    shape_line(table.row_count(), table.column_count())
}

#[must_use]
pub fn render(table: &Table, mode: RenderMode, options: &DisplayOptions) -> String {
    match mode {
        RenderMode::Table => render_table(table, &options.table),
        RenderMode::Summary => render_summary(table, &options.summary),
        RenderMode::Minimal => render_minimal(table),
        RenderMode::Html => render_html(table, &options.html),
    }
}

/// Render with the process-wide default mode and [`DisplayOptions::inspect`]
/// limits.
#[must_use]
pub fn render_default(table: &Table) -> String {
    render(table, default_render_mode(), &DisplayOptions::inspect())
}

/// `(mime type, content)` for rich front-ends.
#[must_use]
pub fn display_pair(
    table: &Table,
    mode: RenderMode,
    options: &DisplayOptions,
) -> (&'static str, String) {
    if table.column_count() == 0 {
        return (TEXT_PLAIN, EMPTY_PAIR_TEXT.to_owned());
    }
    match mode {
        RenderMode::Html => (TEXT_HTML, render_html(table, &options.html)),
        RenderMode::Summary => {
            let limits = if table.row_count() <= SHORT_FRAME_ROWS {
                SummaryLimits {
                    tally: 0,
                    ..options.summary
                }
            } else {
                options.summary
            };
            (TEXT_PLAIN, render_summary(table, &limits))
        }
        RenderMode::Table | RenderMode::Minimal => (TEXT_PLAIN, render(table, mode, options)),
    }
}
