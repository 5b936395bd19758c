#![forbid(unsafe_code)]

//! Typed column store.
//!
//! A [`Table`] owns named, typed, equal-length [`Column`]s. Columns are
//! shared behind `Arc`, so projections and reorderings of whole columns never
//! copy data; only row-wise rebuilds materialize new values.

use std::ops::Range;
use std::sync::Arc;

use af_types::{DType, Scalar, TypeError, cast_scalar_owned, count_nan, count_null, infer_dtype};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColumnError {
    #[error("column '{name}' has length {actual}, expected {expected}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} has {actual} values, schema has {expected} columns")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("slice {start}..{end} out of bounds for length {len}")]
    SliceOutOfBounds { start: usize, end: usize, len: usize },
    #[error("{actual} names given for {expected} columns")]
    NameCountMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Type(#[from] TypeError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    dtype: DType,
    values: Vec<Scalar>,
}

impl Column {
    /// Construct a column, coercing values to the target dtype.
    pub fn new(dtype: DType, values: Vec<Scalar>) -> Result<Self, ColumnError> {
        let needs_coercion = values
            .iter()
            .any(|v| !v.is_null() && (v.dtype() != dtype || dtype.is_integer()));

        let values = if needs_coercion {
            values
                .into_iter()
                .map(|value| cast_scalar_owned(value, dtype))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            values
        };

        Ok(Self { dtype, values })
    }

    pub fn from_values(values: Vec<Scalar>) -> Result<Self, ColumnError> {
        let dtype = infer_dtype(&values)?;
        Self::new(dtype, values)
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    #[must_use]
    pub fn value(&self, idx: usize) -> Option<&Scalar> {
        self.values.get(idx)
    }

    #[must_use]
    pub fn null_count(&self) -> usize {
        count_null(&self.values)
    }

    #[must_use]
    pub fn nan_count(&self) -> usize {
        if self.dtype.is_float() {
            count_nan(&self.values)
        } else {
            0
        }
    }

    /// Contiguous sub-range of the column, keeping its dtype.
    pub fn slice(&self, range: Range<usize>) -> Result<Self, ColumnError> {
        if range.start > range.end || range.end > self.len() {
            return Err(ColumnError::SliceOutOfBounds {
                start: range.start,
                end: range.end,
                len: self.len(),
            });
        }
        Ok(Self {
            dtype: self.dtype,
            values: self.values[range].to_vec(),
        })
    }
}

/// An ordered set of named columns sharing one row count.
///
/// Names are not required to be unique here; the frame layer enforces
/// uniqueness at construction and only projection can repeat a column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Arc<Column>>,
    row_count: usize,
}

impl Table {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from named columns, validating equal lengths.
    pub fn build(columns: Vec<(String, Column)>) -> Result<Self, ColumnError> {
        Self::from_shared(
            columns
                .into_iter()
                .map(|(name, column)| (name, Arc::new(column)))
                .collect(),
        )
    }

    fn from_shared(columns: Vec<(String, Arc<Column>)>) -> Result<Self, ColumnError> {
        let row_count = columns.first().map_or(0, |(_, column)| column.len());
        let mut names = Vec::with_capacity(columns.len());
        let mut shared = Vec::with_capacity(columns.len());
        for (name, column) in columns {
            if column.len() != row_count {
                return Err(ColumnError::LengthMismatch {
                    name,
                    expected: row_count,
                    actual: column.len(),
                });
            }
            names.push(name);
            shared.push(column);
        }
        Ok(Self {
            names,
            columns: shared,
            row_count,
        })
    }

    /// Rebuild a table from row records under an existing schema.
    pub fn from_rows(schema: &[(String, DType)], rows: Vec<Vec<Scalar>>) -> Result<Self, ColumnError> {
        let mut buffers: Vec<Vec<Scalar>> = schema
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != schema.len() {
                return Err(ColumnError::RowWidthMismatch {
                    row: row_idx,
                    expected: schema.len(),
                    actual: row.len(),
                });
            }
            for (buffer, value) in buffers.iter_mut().zip(row) {
                buffer.push(value);
            }
        }

        let columns = schema
            .iter()
            .zip(buffers)
            .map(|((name, dtype), values)| Ok((name.clone(), Column::new(*dtype, values)?)))
            .collect::<Result<Vec<_>, ColumnError>>()?;
        Self::build(columns)
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn column_keys(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.names.iter().position(|name| name == key)
    }

    #[must_use]
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.position(key).map(|idx| self.columns[idx].as_ref())
    }

    #[must_use]
    pub fn column_type(&self, key: &str) -> Option<DType> {
        self.column(key).map(Column::dtype)
    }

    #[must_use]
    pub fn column_values(&self, key: &str) -> Option<&[Scalar]> {
        self.column(key).map(Column::values)
    }

    #[must_use]
    pub fn column_at(&self, idx: usize) -> Option<(&str, &Column)> {
        let name = self.names.get(idx)?;
        Some((name.as_str(), self.columns[idx].as_ref()))
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Arc::as_ref))
    }

    #[must_use]
    pub fn schema(&self) -> Vec<(String, DType)> {
        self.columns()
            .map(|(name, column)| (name.to_owned(), column.dtype()))
            .collect()
    }

    /// One row as an ordered key → value record.
    #[must_use]
    pub fn row_at(&self, position: usize) -> Option<Vec<(&str, &Scalar)>> {
        if position >= self.row_count {
            return None;
        }
        Some(
            self.columns()
                .map(|(name, column)| (name, &column.values()[position]))
                .collect(),
        )
    }

    /// New table made of the columns at `indices`, in that order. Columns are
    /// shared, and an index may repeat.
    #[must_use]
    pub fn project(&self, indices: &[usize]) -> Self {
        let names: Vec<String> = indices.iter().map(|&idx| self.names[idx].clone()).collect();
        let columns: Vec<Arc<Column>> = indices
            .iter()
            .map(|&idx| Arc::clone(&self.columns[idx]))
            .collect();
        let row_count = if columns.is_empty() { 0 } else { self.row_count };
        Self {
            names,
            columns,
            row_count,
        }
    }

    /// Same columns under new names, in order.
    pub fn with_names(&self, names: Vec<String>) -> Result<Self, ColumnError> {
        if names.len() != self.columns.len() {
            return Err(ColumnError::NameCountMismatch {
                expected: self.columns.len(),
                actual: names.len(),
            });
        }
        Ok(Self {
            names,
            columns: self.columns.clone(),
            row_count: self.row_count,
        })
    }

    /// Contiguous row range of every column.
    pub fn slice(&self, range: Range<usize>) -> Result<Self, ColumnError> {
        let columns = self
            .columns()
            .map(|(name, column)| Ok((name.to_owned(), column.slice(range.clone())?)))
            .collect::<Result<Vec<_>, ColumnError>>()?;
        Self::build(columns)
    }
}

#[cfg(test)]
mod tests {
    use af_types::{DType, Scalar};

    use super::{Column, ColumnError, Table};

    fn sample() -> Table {
        Table::build(vec![
            (
                "x".to_owned(),
                Column::from_values(vec![Scalar::Int64(1), Scalar::Int64(2), Scalar::Int64(3)])
                    .expect("x"),
            ),
            (
                "y".to_owned(),
                Column::from_values(vec!["A".into(), "B".into(), Scalar::Null]).expect("y"),
            ),
        ])
        .expect("table")
    }

    #[test]
    fn column_infers_and_coerces() {
        let column = Column::from_values(vec![Scalar::Int64(1), Scalar::Float64(2.5)]).expect("col");
        assert_eq!(column.dtype(), DType::Double);
        assert_eq!(column.values(), &[Scalar::Float64(1.0), Scalar::Float64(2.5)]);
    }

    #[test]
    fn column_new_rejects_out_of_range_values() {
        let err = Column::new(DType::UInt8, vec![Scalar::Int64(300)]).expect_err("overflow");
        assert!(matches!(err, ColumnError::Type(_)));
    }

    #[test]
    fn nan_count_only_applies_to_float_columns() {
        let floats =
            Column::from_values(vec![Scalar::Float64(f64::NAN), Scalar::Null]).expect("floats");
        assert_eq!(floats.nan_count(), 1);
        assert_eq!(floats.null_count(), 1);
    }

    #[test]
    fn build_rejects_ragged_columns() {
        let err = Table::build(vec![
            ("a".to_owned(), Column::from_values(vec![Scalar::Int64(1)]).expect("a")),
            (
                "b".to_owned(),
                Column::from_values(vec![Scalar::Int64(1), Scalar::Int64(2)]).expect("b"),
            ),
        ])
        .expect_err("ragged");
        assert_eq!(
            err,
            ColumnError::LengthMismatch {
                name: "b".to_owned(),
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn row_at_returns_ordered_record() {
        let table = sample();
        let row = table.row_at(2).expect("row");
        assert_eq!(row, vec![("x", &Scalar::Int64(3)), ("y", &Scalar::Null)]);
        assert!(table.row_at(3).is_none());
    }

    #[test]
    fn from_rows_keeps_schema_types() {
        let table = sample();
        let rows = vec![
            vec![Scalar::Int64(3), Scalar::Null],
            vec![Scalar::Int64(3), Scalar::Null],
        ];
        let rebuilt = Table::from_rows(&table.schema(), rows).expect("rebuild");
        assert_eq!(rebuilt.row_count(), 2);
        assert_eq!(rebuilt.column_type("x"), Some(DType::UInt8));
        assert_eq!(rebuilt.column_type("y"), Some(DType::Utf8));
    }

    #[test]
    fn from_rows_with_no_rows_keeps_columns() {
        let table = sample();
        let rebuilt = Table::from_rows(&table.schema(), Vec::new()).expect("rebuild");
        assert_eq!(rebuilt.row_count(), 0);
        assert_eq!(rebuilt.column_keys(), vec!["x", "y"]);
    }

    #[test]
    fn project_allows_repeats() {
        let table = sample();
        let projected = table.project(&[1, 0, 1]);
        assert_eq!(projected.column_keys(), vec!["y", "x", "y"]);
        assert_eq!(projected.row_count(), 3);
    }

    #[test]
    fn with_names_shares_columns() {
        let table = sample();
        let renamed = table
            .with_names(vec!["a".to_owned(), "b".to_owned()])
            .expect("rename");
        assert_eq!(renamed.column_keys(), vec!["a", "b"]);
        assert_eq!(renamed.column_values("a"), table.column_values("x"));
        assert!(table.with_names(vec!["only".to_owned()]).is_err());
    }

    #[test]
    fn slice_checks_bounds() {
        let table = sample();
        let sliced = table.slice(1..3).expect("slice");
        assert_eq!(sliced.column_values("x"), Some(&[Scalar::Int64(2), Scalar::Int64(3)][..]));
        assert!(table.slice(2..5).is_err());
    }
}
