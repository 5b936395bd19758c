//! Aligned plain-text table.

use af_columnar::{Column, Table};
use af_types::{Scalar, date_literal, float_literal, timestamp_literal};
use log::debug;

use crate::config::TableLimits;
use crate::text::{Align, display_width, pad, shape_line, single_line};

const ROW_ELLIPSIS: &str = ":";
const COLUMN_ELLIPSIS: &str = "...";

/// Cell text: missing as `(nil)`, strings unquoted.
#[must_use]
pub fn cell_text(value: &Scalar) -> String {
    match value {
        Scalar::Null => "(nil)".to_owned(),
        Scalar::Bool(v) => v.to_string(),
        Scalar::Int64(v) => v.to_string(),
        Scalar::Float64(v) => float_literal(*v),
        Scalar::Utf8(v) => single_line(v),
        Scalar::Date32(v) => date_literal(v),
        Scalar::Timestamp(v) => timestamp_literal(v),
    }
}

/// Row positions to print; `None` marks the `:` gap row.
fn row_plan(rows: usize, limits: &TableLimits) -> Vec<Option<usize>> {
    if rows > limits.head + limits.tail {
        debug!(
            "table rows truncated: {rows} rows, head {} tail {}",
            limits.head, limits.tail
        );
        (0..limits.head)
            .map(Some)
            .chain(std::iter::once(None))
            .chain((rows - limits.tail..rows).map(Some))
            .collect()
    } else {
        (0..rows).map(Some).collect()
    }
}

struct TextColumn {
    header: String,
    type_tag: String,
    cells: Vec<String>,
    align: Align,
}

impl TextColumn {
    fn data(key: &str, column: &Column, plan: &[Option<usize>]) -> Self {
        let cells = plan
            .iter()
            .map(|slot| match slot.and_then(|row| column.value(row)) {
                Some(value) => cell_text(value),
                None => ROW_ELLIPSIS.to_owned(),
            })
            .collect();
        let align = if column.dtype().is_numeric() {
            Align::Right
        } else {
            Align::Left
        };
        Self {
            header: single_line(key),
            type_tag: format!("<{}>", column.dtype()),
            cells,
            align,
        }
    }

    fn index(plan: &[Option<usize>]) -> Self {
        Self {
            header: String::new(),
            type_tag: String::new(),
            cells: plan
                .iter()
                .map(|slot| slot.map_or_else(|| ROW_ELLIPSIS.to_owned(), |row| row.to_string()))
                .collect(),
            align: Align::Right,
        }
    }

    fn ellipsis(rows: usize) -> Self {
        Self {
            header: COLUMN_ELLIPSIS.to_owned(),
            type_tag: COLUMN_ELLIPSIS.to_owned(),
            cells: vec![COLUMN_ELLIPSIS.to_owned(); rows],
            align: Align::Right,
        }
    }

    fn width(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| display_width(cell))
            .chain([display_width(&self.header), display_width(&self.type_tag)])
            .max()
            .unwrap_or(0)
    }
}

/// Keep leading data columns while they fit the width budget together with
/// the row index and the last column, both of which are always shown.
fn fit_columns(mut columns: Vec<TextColumn>, budget: usize, rows: usize) -> Vec<TextColumn> {
    // columns[0] is the row index; nothing can be dropped without two data
    // columns.
    if columns.len() < 3 {
        return columns;
    }
    let last_idx = columns.len() - 1;
    let mut total = columns[0].width() + columns[last_idx].width();
    let cut = (1..last_idx).find(|&idx| {
        let width = columns[idx].width();
        if total + width > budget {
            true
        } else {
            total += width;
            false
        }
    });

    match cut {
        Some(idx) => {
            debug!(
                "table columns truncated: keeping {idx} of {last_idx} data columns, {} dropped",
                last_idx - idx
            );
            let last = columns.split_off(last_idx);
            columns.truncate(idx);
            columns.push(TextColumn::ellipsis(rows));
            columns.extend(last);
            columns
        }
        None => columns,
    }
}

fn join_line<'a>(parts: impl Iterator<Item = (&'a str, usize, Align)>) -> String {
    let cells: Vec<String> = parts.map(|(text, width, align)| pad(text, width, align)).collect();
    cells.join(" ").trim_end().to_owned()
}

#[must_use]
pub fn render_table(table: &Table, limits: &TableLimits) -> String {
    let header = shape_line(table.row_count(), table.column_count());
    if table.column_count() == 0 {
        return format!("{header}\n");
    }

    let plan = row_plan(table.row_count(), limits);
    let mut columns = vec![TextColumn::index(&plan)];
    columns.extend(
        table
            .columns()
            .map(|(key, column)| TextColumn::data(key, column, &plan)),
    );
    let columns = fit_columns(columns, limits.width, plan.len());
    let widths: Vec<usize> = columns.iter().map(TextColumn::width).collect();

    let mut lines = vec![header];
    lines.push(join_line(
        columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| (c.header.as_str(), *w, c.align)),
    ));
    lines.push(join_line(
        columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| (c.type_tag.as_str(), *w, c.align)),
    ));
    for row in 0..plan.len() {
        lines.push(join_line(
            columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| (c.cells[row].as_str(), *w, c.align)),
        ));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
