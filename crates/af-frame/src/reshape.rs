use std::collections::{BTreeMap, BTreeSet};

use af_columnar::{Column, Table};
use af_types::{DType, Scalar};
use log::debug;

use crate::{DataFrame, FrameError, first_unused};

const DEFAULT_NAME_KEY: &str = "name";
const DEFAULT_VALUE_KEY: &str = "value";

/// Output slot of a `to_long` column, in first-appearance order.
enum LongSlot {
    Kept(usize),
    NameAndValue,
}

impl DataFrame {
    /// Pivot so each row becomes a column keyed by its value in `key`.
    ///
    /// `key` defaults to the first column and `new_key` to `name`. The first
    /// result column, `new_key`, lists the remaining source keys. When
    /// `new_key` clashes with a pivot value, the first free key of `name1`,
    /// `name2`, ... is used instead. A repeated pivot value replaces the
    /// earlier column in place.
    pub fn transpose(&self, key: Option<&str>, new_key: Option<&str>) -> Result<Self, FrameError> {
        let keys = self.keys();
        let pivot_key = match key {
            Some(key) => key,
            None => keys.first().copied().ok_or_else(|| {
                FrameError::InvalidSelector("cannot transpose a frame without columns".to_owned())
            })?,
        };
        let pivot_idx = self.table.position(pivot_key).ok_or_else(|| {
            FrameError::InvalidSelector(format!("pivot key '{pivot_key}' is not a column"))
        })?;

        let labels: Vec<String> = self
            .table
            .column_at(pivot_idx)
            .map(|(_, column)| column.values().iter().map(Scalar::to_label).collect())
            .unwrap_or_default();
        let taken: BTreeSet<String> = labels.iter().cloned().collect();
        let requested = new_key.unwrap_or(DEFAULT_NAME_KEY);
        let new_key = if taken.contains(requested) {
            first_unused(DEFAULT_NAME_KEY, &taken)
        } else {
            requested.to_owned()
        };

        let others: Vec<(&str, &Column)> = self
            .columns()
            .enumerate()
            .filter(|(idx, _)| *idx != pivot_idx)
            .map(|(_, entry)| entry)
            .collect();
        debug!(
            "transpose on '{pivot_key}': {} rows become columns, index key '{new_key}'",
            labels.len()
        );

        let mut out: Vec<(String, Vec<Scalar>)> = vec![(
            new_key,
            others.iter().map(|(name, _)| Scalar::from(*name)).collect(),
        )];
        let mut slots: BTreeMap<String, usize> = BTreeMap::new();
        for (row, label) in labels.into_iter().enumerate() {
            let values: Vec<Scalar> = others
                .iter()
                .map(|(_, column)| column.value(row).cloned().unwrap_or(Scalar::Null))
                .collect();
            match slots.get(&label) {
                Some(&slot) => out[slot].1 = values,
                None => {
                    slots.insert(label.clone(), out.len());
                    out.push((label, values));
                }
            }
        }

        Self::from_columns(out)
    }

    /// Melt every column not in `keep` into `name` / `value` pairs, walking
    /// the frame row by row.
    ///
    /// Kept columns repeat each value once per melted column. Result columns
    /// appear in the order they are first produced by the walk.
    pub fn to_long(
        &self,
        keep: &[&str],
        name: Option<&str>,
        value: Option<&str>,
    ) -> Result<Self, FrameError> {
        let name_key = name.unwrap_or(DEFAULT_NAME_KEY);
        let value_key = value.unwrap_or(DEFAULT_VALUE_KEY);

        if let Some(missing) = keep.iter().find(|key| self.table.position(key).is_none()) {
            return Err(FrameError::UnknownColumn((*missing).to_owned()));
        }
        let mut seen = BTreeSet::new();
        if let Some(repeated) = keep.iter().find(|key| !seen.insert(**key)) {
            return Err(FrameError::DuplicateColumn((*repeated).to_owned()));
        }
        for reserved in [name_key, value_key] {
            if keep.contains(&reserved) {
                return Err(FrameError::InvalidSelector(format!(
                    "'{reserved}' is a kept column and cannot hold melted output"
                )));
            }
        }
        if name_key == value_key {
            return Err(FrameError::InvalidSelector(format!(
                "name and value columns are both '{name_key}'"
            )));
        }

        let kept: Vec<bool> = self.keys().iter().map(|key| keep.contains(key)).collect();
        let melt_count = kept.iter().filter(|is_kept| !**is_kept).count();
        let out_rows = self.row_count() * melt_count;
        debug!(
            "to_long: keeping {} columns, melting {melt_count} into {out_rows} rows",
            keep.len()
        );

        let mut layout: Vec<LongSlot> = Vec::with_capacity(keep.len() + 2);
        let mut kept_buffers: BTreeMap<usize, Vec<Scalar>> = BTreeMap::new();
        for (idx, is_kept) in kept.iter().enumerate() {
            if *is_kept {
                layout.push(LongSlot::Kept(idx));
                kept_buffers.insert(idx, Vec::with_capacity(out_rows));
            } else if !layout.iter().any(|slot| matches!(slot, LongSlot::NameAndValue)) {
                layout.push(LongSlot::NameAndValue);
            }
        }
        if melt_count == 0 {
            layout.push(LongSlot::NameAndValue);
        }

        let mut names = Vec::with_capacity(out_rows);
        let mut values = Vec::with_capacity(out_rows);
        for row in 0..self.row_count() {
            let Some(record) = self.table.row_at(row) else {
                break;
            };
            for (idx, (key, cell)) in record.into_iter().enumerate() {
                match kept_buffers.get_mut(&idx) {
                    Some(buffer) => {
                        buffer.extend(std::iter::repeat_n(cell.clone(), melt_count));
                    }
                    None => {
                        names.push(Scalar::from(key));
                        values.push(cell.clone());
                    }
                }
            }
        }

        let mut name_and_value = Some((names, values));
        let mut columns: Vec<(String, Column)> = Vec::with_capacity(layout.len() + 1);
        for slot in layout {
            match slot {
                LongSlot::Kept(idx) => {
                    let Some((key, source)) = self.table.column_at(idx) else {
                        continue;
                    };
                    let buffer = kept_buffers.remove(&idx).unwrap_or_default();
                    columns.push((key.to_owned(), Column::new(source.dtype(), buffer)?));
                }
                LongSlot::NameAndValue => {
                    if let Some((names, values)) = name_and_value.take() {
                        columns.push((name_key.to_owned(), Column::new(DType::Utf8, names)?));
                        columns.push((value_key.to_owned(), Column::from_values(values)?));
                    }
                }
            }
        }

        Self::from_table(Table::build(columns)?)
    }

    /// [`DataFrame::to_long`] with the `name` / `value` output keys.
    pub fn to_long_default(&self, keep: &[&str]) -> Result<Self, FrameError> {
        self.to_long(keep, None, None)
    }
}
