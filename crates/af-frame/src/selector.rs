//! Selector tokens for `DataFrame::select` and their normalization into a
//! row or column selection.

use std::ops::{Range, RangeInclusive};

use serde::{Deserialize, Serialize};

use crate::FrameError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Selector {
    Index(i64),
    Range { start: i64, end: i64, inclusive: bool },
    Key(String),
}

impl From<i64> for Selector {
    fn from(value: i64) -> Self {
        Self::Index(value)
    }
}

impl From<i32> for Selector {
    fn from(value: i32) -> Self {
        Self::Index(i64::from(value))
    }
}

impl From<Range<i64>> for Selector {
    fn from(range: Range<i64>) -> Self {
        Self::Range {
            start: range.start,
            end: range.end,
            inclusive: false,
        }
    }
}

impl From<RangeInclusive<i64>> for Selector {
    fn from(range: RangeInclusive<i64>) -> Self {
        Self::Range {
            start: *range.start(),
            end: *range.end(),
            inclusive: true,
        }
    }
}

impl From<&str> for Selector {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for Selector {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

/// What a normalized selector list addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Rows(Vec<i64>),
    Columns(Vec<String>),
}

/// Expand ranges and classify the selector list as a whole.
///
/// Reversed ranges expand to nothing. A list that is empty before or after
/// expansion, or that mixes positions with keys, is rejected.
pub fn normalize(selectors: &[Selector]) -> Result<Selection, FrameError> {
    if selectors.is_empty() {
        return Err(FrameError::InvalidSelector("empty selector list".to_owned()));
    }

    let mut positions = Vec::new();
    let mut keys = Vec::new();
    for selector in selectors {
        match selector {
            Selector::Index(position) => positions.push(*position),
            Selector::Range {
                start,
                end,
                inclusive: true,
            } => positions.extend(*start..=*end),
            Selector::Range {
                start,
                end,
                inclusive: false,
            } => positions.extend(*start..*end),
            Selector::Key(key) => keys.push(key.clone()),
        }
    }

    match (positions.is_empty(), keys.is_empty()) {
        (false, true) => Ok(Selection::Rows(positions)),
        (true, false) => Ok(Selection::Columns(keys)),
        (true, true) => Err(FrameError::InvalidSelector(
            "selector list expands to nothing".to_owned(),
        )),
        (false, false) => Err(FrameError::InvalidSelector(format!(
            "cannot mix {} row positions with {} column keys",
            positions.len(),
            keys.len()
        ))),
    }
}
