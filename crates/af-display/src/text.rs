//! Width-aware padding and the small literal helpers shared by renderers.

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

#[must_use]
pub fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(text)));
    match align {
        Align::Left => format!("{text}{fill}"),
        Align::Right => format!("{fill}{text}"),
    }
}

/// `noun` with an `s` unless `count` is exactly one.
#[must_use]
pub fn plural(noun: &str, count: usize) -> String {
    if count == 1 {
        noun.to_owned()
    } else {
        format!("{noun}s")
    }
}

/// Decimal digit count of `n` (`0` has one digit).
#[must_use]
pub fn digits(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// `DataFrame : 6 x 4 Vectors`, or `DataFrame : (empty)` without columns.
#[must_use]
pub fn shape_line(rows: usize, columns: usize) -> String {
    if columns == 0 {
        "DataFrame : (empty)".to_owned()
    } else {
        format!(
            "DataFrame : {rows} x {columns} {}",
            plural("Vector", columns)
        )
    }
}

fn is_plain_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

/// `:integer`, or `:"a b"` when the key is not a plain identifier.
#[must_use]
pub fn key_literal(key: &str) -> String {
    if is_plain_identifier(key) {
        format!(":{key}")
    } else {
        format!(":{key:?}")
    }
}

/// Control characters escaped so a cell stays on one line.
#[must_use]
pub fn single_line(text: &str) -> String {
    if !text.chars().any(char::is_control) {
        return text.to_owned();
    }
    text.chars()
        .map(|c| {
            if c.is_control() {
                c.escape_default().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}
