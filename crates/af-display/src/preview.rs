//! Compact value previews for the summary renderer.

use af_columnar::Column;
use af_types::{Scalar, date_literal, float_literal, timestamp_literal};

use crate::classify::classify;
use crate::config::SummaryLimits;
use crate::level::{LevelAnalysis, analyze};
use crate::text::plural;

/// Preview literal of one value: strings quoted, missing as `nil`.
#[must_use]
pub fn literal(value: &Scalar) -> String {
    match value {
        Scalar::Null => "nil".to_owned(),
        Scalar::Bool(v) => v.to_string(),
        Scalar::Int64(v) => v.to_string(),
        Scalar::Float64(v) => float_literal(*v),
        Scalar::Utf8(v) => format!("{v:?}"),
        Scalar::Date32(v) => date_literal(v),
        Scalar::Timestamp(v) => timestamp_literal(v),
    }
}

/// `[1, 2, 3]`, or `[1, 2, ... ]` when `values` holds more than `elements`.
#[must_use]
pub fn leading_values(values: &[Scalar], elements: usize) -> String {
    let shown: Vec<String> = values.iter().take(elements).map(literal).collect();
    if values.len() <= elements {
        format!("[{}]", shown.join(", "))
    } else if shown.is_empty() {
        "[... ]".to_owned()
    } else {
        format!("[{}, ... ]", shown.join(", "))
    }
}

/// `{"A"=>2, "B"=>1}`
#[must_use]
pub fn tally_literal(tally: &[(Scalar, usize)]) -> String {
    let entries: Vec<String> = tally
        .iter()
        .map(|(value, count)| format!("{}=>{count}", literal(value)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

/// `, 1 NaN, 2 nils`; empty when the column has neither.
#[must_use]
pub fn missing_annotations(column: &Column) -> String {
    let mut out = String::new();
    let nan = column.nan_count();
    if nan > 0 {
        out.push_str(&format!(", {nan} {}", plural("NaN", nan)));
    }
    let nil = column.null_count();
    if nil > 0 {
        out.push_str(&format!(", {nil} {}", plural("nil", nil)));
    }
    out
}

/// Level and `data_preview` text for one column.
#[must_use]
pub fn column_preview(column: &Column, limits: &SummaryLimits) -> (usize, String) {
    let group = classify(column.dtype());
    let LevelAnalysis { level, tally } = analyze(column.values(), limits.tally);

    if !group.is_tallied() {
        return (level, leading_values(column.values(), limits.elements));
    }
    match tally {
        Some(tally) if level != column.len() => (level, tally_literal(&tally)),
        _ => {
            let list = leading_values(column.values(), limits.elements);
            (level, format!("{list}{}", missing_annotations(column)))
        }
    }
}
