#![forbid(unsafe_code)]

//! Immutable columnar DataFrame.
//!
//! A [`DataFrame`] is an ordered set of named, typed, equal-length columns.
//! Every operation returns a new frame; columns are reference counted so
//! whole-column operations share storage with their source.

mod reshape;
pub mod selector;

use std::collections::BTreeSet;
use std::fmt;

use af_columnar::{Column, ColumnError, Table};
use af_display::{
    DisplayOptions, RenderMode, SummaryLimit, SummaryLimits, TypeGroup, classify,
    default_render_mode,
};
use af_types::{DType, Scalar};
use log::debug;
use thiserror::Error;

pub use selector::{Selection, Selector};

pub const DEFAULT_ROW_COUNT: i64 = 5;
const UNNAMED_KEY: &str = "unnamed";

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
    #[error("column '{0}' not found")]
    UnknownColumn(String),
    #[error("row position {position} out of bounds for length {len}")]
    IndexOutOfRange { position: i64, len: usize },
    #[error("unsupported input: {0}")]
    TypeMismatch(String),
    #[error("duplicate column key '{0}'")]
    DuplicateColumn(String),
    #[error(transparent)]
    Column(#[from] ColumnError),
}

/// Raw construction shapes accepted by [`DataFrame::from_raw`].
#[derive(Debug, Clone)]
pub enum RawInput {
    Columns(Vec<(String, Vec<Scalar>)>),
    RowsWithSchema {
        schema: Vec<(String, DType)>,
        rows: Vec<Vec<Scalar>>,
    },
    Frame(DataFrame),
    Empty,
    /// Rows without a schema; keys cannot be derived.
    Rows(Vec<Vec<Scalar>>),
    /// A bare value list; not a frame shape.
    Values(Vec<Scalar>),
}

/// `base1`, `base2`, ...: the first candidate not in `taken`.
#[must_use]
pub fn first_unused(base: &str, taken: &BTreeSet<String>) -> String {
    let mut n: usize = 1;
    loop {
        let candidate = format!("{base}{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Rewrite empty or blank keys to `unnamedN` and reject explicit duplicates.
fn normalize_keys(keys: Vec<String>) -> Result<Vec<String>, FrameError> {
    let mut taken = BTreeSet::new();
    for key in keys.iter().filter(|key| !key.trim().is_empty()) {
        if !taken.insert(key.clone()) {
            return Err(FrameError::DuplicateColumn(key.clone()));
        }
    }
    Ok(keys
        .into_iter()
        .map(|key| {
            if key.trim().is_empty() {
                let renamed = first_unused(UNNAMED_KEY, &taken);
                debug!("blank key {key:?} renamed to '{renamed}'");
                taken.insert(renamed.clone());
                renamed
            } else {
                key
            }
        })
        .collect())
}

fn normalize_position(position: i64, len: usize) -> Result<usize, FrameError> {
    let out_of_range = || FrameError::IndexOutOfRange { position, len };
    let len_i128 = i128::try_from(len).map_err(|_| out_of_range())?;
    let position_i128 = i128::from(position);
    let normalized = if position_i128 < 0 {
        len_i128 + position_i128
    } else {
        position_i128
    };
    if normalized < 0 || normalized >= len_i128 {
        return Err(out_of_range());
    }
    usize::try_from(normalized).map_err(|_| out_of_range())
}

fn non_negative_count(n: i64, op: &str) -> Result<usize, FrameError> {
    usize::try_from(n)
        .map_err(|_| FrameError::InvalidSelector(format!("{op} count must be non-negative, got {n}")))
}

fn positions(range: std::ops::Range<usize>) -> Vec<i64> {
    range
        .map(|pos| i64::try_from(pos).unwrap_or(i64::MAX))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    table: Table,
}

impl DataFrame {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a frame from named value lists, inferring each column's type.
    pub fn from_columns<K>(columns: Vec<(K, Vec<Scalar>)>) -> Result<Self, FrameError>
    where
        K: Into<String>,
    {
        let (keys, values): (Vec<String>, Vec<Vec<Scalar>>) = columns
            .into_iter()
            .map(|(key, values)| (key.into(), values))
            .unzip();
        let keys = normalize_keys(keys)?;
        let columns = keys
            .into_iter()
            .zip(values)
            .map(|(key, values)| Ok((key, Column::from_values(values)?)))
            .collect::<Result<Vec<_>, ColumnError>>()?;
        Ok(Self {
            table: Table::build(columns)?,
        })
    }

    /// Build a frame from row records under an explicit schema.
    pub fn from_rows_with_schema(
        schema: Vec<(String, DType)>,
        rows: Vec<Vec<Scalar>>,
    ) -> Result<Self, FrameError> {
        let (keys, dtypes): (Vec<String>, Vec<DType>) = schema.into_iter().unzip();
        let schema: Vec<(String, DType)> = normalize_keys(keys)?.into_iter().zip(dtypes).collect();
        Ok(Self {
            table: Table::from_rows(&schema, rows)?,
        })
    }

    #[must_use]
    pub fn from_copy(other: &Self) -> Self {
        other.clone()
    }

    /// Wrap an existing table, applying the same key rules as the other
    /// constructors.
    pub fn from_table(table: Table) -> Result<Self, FrameError> {
        let keys: Vec<String> = table.column_keys().into_iter().map(str::to_owned).collect();
        let normalized = normalize_keys(keys.clone())?;
        if normalized == keys {
            return Ok(Self { table });
        }
        Ok(Self {
            table: table.with_names(normalized)?,
        })
    }

    pub fn from_raw(input: RawInput) -> Result<Self, FrameError> {
        match input {
            RawInput::Columns(columns) => Self::from_columns(columns),
            RawInput::RowsWithSchema { schema, rows } => Self::from_rows_with_schema(schema, rows),
            RawInput::Frame(frame) => Ok(frame),
            RawInput::Empty => Ok(Self::empty()),
            RawInput::Rows(rows) => Err(FrameError::TypeMismatch(format!(
                "{} rows given without a schema",
                rows.len()
            ))),
            RawInput::Values(values) => Err(FrameError::TypeMismatch(format!(
                "a list of {} values is not a frame; name it as a column",
                values.len()
            ))),
        }
    }

    // ── Properties ─────────────────────────────────────────────────────

    #[must_use]
    pub fn table(&self) -> &Table {
        &self.table
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.table.row_count()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.table.column_count()
    }

    /// `(rows, columns)`
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.column_count() == 0
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.table.column_keys()
    }

    #[must_use]
    pub fn types(&self) -> Vec<DType> {
        self.table.columns().map(|(_, column)| column.dtype()).collect()
    }

    #[must_use]
    pub fn type_groups(&self) -> Vec<TypeGroup> {
        self.types().into_iter().map(classify).collect()
    }

    #[must_use]
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.table.column(key)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.table.columns()
    }

    /// Row records in order, values in column order.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Scalar>> {
        (0..self.row_count())
            .filter_map(|pos| self.table.row_at(pos))
            .map(|record| record.into_iter().map(|(_, value)| value.clone()).collect())
            .collect()
    }

    /// Ordered key → values pairs.
    #[must_use]
    pub fn to_map(&self) -> Vec<(String, Vec<Scalar>)> {
        self.columns()
            .map(|(key, column)| (key.to_owned(), column.values().to_vec()))
            .collect()
    }

    // ── Selection ──────────────────────────────────────────────────────

    /// Generalized indexing: positions and ranges select rows, keys select
    /// columns.
    pub fn select(&self, selectors: &[Selector]) -> Result<Self, FrameError> {
        match selector::normalize(selectors)? {
            Selection::Rows(positions) => {
                debug!("select: {} row positions", positions.len());
                self.select_rows(&positions)
            }
            Selection::Columns(keys) => {
                debug!("select: {} column keys", keys.len());
                self.select_columns(&keys)
            }
        }
    }

    /// Columns by key, in the requested order. Keys may repeat.
    pub fn select_columns<S: AsRef<str>>(&self, keys: &[S]) -> Result<Self, FrameError> {
        let indices = keys
            .iter()
            .map(|key| {
                let key = key.as_ref();
                self.table
                    .position(key)
                    .ok_or_else(|| FrameError::UnknownColumn(key.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            table: self.table.project(&indices),
        })
    }

    /// Rows by position, in the requested order. Negative positions count
    /// from the end and positions may repeat.
    pub fn select_rows(&self, positions: &[i64]) -> Result<Self, FrameError> {
        let len = self.row_count();
        let rows = positions
            .iter()
            .map(|&position| {
                let pos = normalize_position(position, len)?;
                let record = self
                    .table
                    .row_at(pos)
                    .ok_or(FrameError::IndexOutOfRange { position, len })?;
                Ok(record.into_iter().map(|(_, value)| value.clone()).collect())
            })
            .collect::<Result<Vec<Vec<Scalar>>, FrameError>>()?;
        Ok(Self {
            table: Table::from_rows(&self.table.schema(), rows)?,
        })
    }

    /// The first `n` rows, or all rows when fewer exist.
    pub fn head(&self, n: i64) -> Result<Self, FrameError> {
        let take = non_negative_count(n, "head")?.min(self.row_count());
        self.select_rows(&positions(0..take))
    }

    /// The last `n` rows, or all rows when fewer exist.
    pub fn tail(&self, n: i64) -> Result<Self, FrameError> {
        let len = self.row_count();
        let take = non_negative_count(n, "tail")?.min(len);
        self.select_rows(&positions(len - take..len))
    }

    pub fn head_default(&self) -> Result<Self, FrameError> {
        self.head(DEFAULT_ROW_COUNT)
    }

    pub fn tail_default(&self) -> Result<Self, FrameError> {
        self.tail(DEFAULT_ROW_COUNT)
    }

    pub fn first(&self, n: i64) -> Result<Self, FrameError> {
        self.head(n)
    }

    pub fn last(&self, n: i64) -> Result<Self, FrameError> {
        self.tail(n)
    }

    pub fn first_row(&self) -> Result<Self, FrameError> {
        self.head(1)
    }

    pub fn last_row(&self) -> Result<Self, FrameError> {
        self.tail(1)
    }

    // ── Rendering ──────────────────────────────────────────────────────

    /// Render in the process-wide default mode.
    #[must_use]
    pub fn render(&self) -> String {
        af_display::render_default(&self.table)
    }

    #[must_use]
    pub fn render_with(&self, mode: RenderMode, options: &DisplayOptions) -> String {
        af_display::render(&self.table, mode, options)
    }

    #[must_use]
    pub fn render_summary(&self, limit: SummaryLimit, tally: usize, elements: usize) -> String {
        let limits = SummaryLimits {
            limit,
            tally,
            elements,
        };
        af_display::render_summary(&self.table, &limits)
    }

    /// `(mime type, content)` in the process-wide default mode.
    #[must_use]
    pub fn to_display_pair(&self) -> (&'static str, String) {
        self.to_display_pair_with(default_render_mode())
    }

    #[must_use]
    pub fn to_display_pair_with(&self, mode: RenderMode) -> (&'static str, String) {
        af_display::display_pair(&self.table, mode, &DisplayOptions::default())
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
