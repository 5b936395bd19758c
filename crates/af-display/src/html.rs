//! HTML table for notebook front-ends.

use af_columnar::Table;
use af_types::{Scalar, date_literal, float_literal, timestamp_literal};
use log::debug;

use crate::config::HtmlLimits;
use crate::text::plural;

const VERTICAL_ELLIPSIS: &str = "&#8942;";
const HORIZONTAL_ELLIPSIS: &str = "&#8230;";

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Largest magnitude at which an integral float still prints as a plain
/// integer.
const INTEGRAL_FLOAT_LIMIT: f64 = 1e16;

fn float_html(value: f64) -> String {
    if value.is_finite() && value == value.trunc() && value.abs() < INTEGRAL_FLOAT_LIMIT {
        (value as i64).to_string()
    } else {
        float_literal(value)
    }
}

#[must_use]
pub fn html_cell(value: &Scalar) -> String {
    match value {
        Scalar::Null => "<i>(nil)</i>".to_owned(),
        Scalar::Bool(v) => format!("<i>({v})</i>"),
        Scalar::Int64(v) => v.to_string(),
        Scalar::Float64(v) => float_html(*v),
        Scalar::Utf8(v) if v.trim().is_empty() => format!("{v:?}"),
        Scalar::Utf8(v) => escape(v),
        Scalar::Date32(v) => date_literal(v),
        Scalar::Timestamp(v) => timestamp_literal(v),
    }
}

/// Positions to show out of `total`; `None` marks the ellipsis slot.
fn window(total: usize, max: usize) -> Vec<Option<usize>> {
    if total <= max {
        return (0..total).map(Some).collect();
    }
    let head = max / 2;
    let tail = max.saturating_sub(head + 1);
    (0..head)
        .map(Some)
        .chain(std::iter::once(None))
        .chain((total - tail..total).map(Some))
        .collect()
}

#[must_use]
pub fn render_html(table: &Table, limits: &HtmlLimits) -> String {
    let rows = table.row_count();
    let columns = table.column_count();
    let caption = if columns == 0 {
        "DataFrame <(empty)>".to_owned()
    } else {
        format!("DataFrame <{rows} x {columns} {}>", plural("vector", columns))
    };

    let row_plan = window(rows, limits.max_rows);
    let column_plan = window(columns, limits.max_columns);
    if row_plan.len() < rows || column_plan.len() < columns {
        debug!(
            "html truncated to {} of {rows} rows, {} of {columns} columns",
            row_plan.len(),
            column_plan.len()
        );
    }

    let mut out = format!("{caption} <table><tr>");
    for slot in &column_plan {
        let header = match slot.and_then(|idx| table.column_at(idx)) {
            Some((key, _)) => escape(key),
            None => HORIZONTAL_ELLIPSIS.to_owned(),
        };
        out.push_str(&format!("<th>{header}</th>"));
    }
    out.push_str("</tr>");

    for row in &row_plan {
        out.push_str("<tr>");
        for slot in &column_plan {
            let cell = match (row, slot.and_then(|idx| table.column_at(idx))) {
                (None, _) => VERTICAL_ELLIPSIS.to_owned(),
                (Some(_), None) => HORIZONTAL_ELLIPSIS.to_owned(),
                (Some(row), Some((_, column))) => {
                    column.value(*row).map_or_else(String::new, html_cell)
                }
            };
            out.push_str(&format!("<td>{cell}</td>"));
        }
        out.push_str("</tr>");
    }
    out.push_str("</table>");
    out
}
