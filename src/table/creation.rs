// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Methods for creating [`MetricTable`] instances from rows and from other
//! tables.

use std::collections::HashSet;

use polars::prelude::{DataFrame, NamedFrom, Series};

use crate::Error;

use super::{value_column, Attrs, ColumnAxis, MetricTable, Row, RowKey, VALUE_PREFIX};

/// `MetricTable` instantiation.
impl MetricTable {
    /// Creates a new [`MetricTable`] from the given row levels, column axis and
    /// rows.
    ///
    /// Returns an error if the level names are not unique or use the reserved
    /// `__value_` prefix, or if a row's key or values don't fit the levels and
    /// columns.
    pub fn try_new<S, K>(
        index_names: impl IntoIterator<Item = S>,
        columns: ColumnAxis,
        rows: impl IntoIterator<Item = (K, Vec<f64>)>,
    ) -> Result<Self, Error>
    where
        S: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        let index_names = index_names.into_iter().map(Into::into).collect::<Vec<_>>();

        let mut seen = HashSet::new();
        for name in &index_names {
            if !seen.insert(name.as_str()) {
                return Err(Error::schema_mismatch(format!(
                    "Duplicate row level name: '{name}'."
                )));
            }
            if name.starts_with(VALUE_PREFIX) {
                return Err(Error::schema_mismatch(format!(
                    "Row level name '{name}' uses the reserved prefix '{VALUE_PREFIX}'."
                )));
            }
        }

        let n_columns = columns.len();
        let mut checked = Vec::new();
        for (key, values) in rows {
            let key: RowKey = key.into_iter().map(Into::into).collect();
            if key.len() != index_names.len() {
                return Err(Error::schema_mismatch(format!(
                    "Row key {:?} has {} values, but there are {} row levels {:?}.",
                    key,
                    key.len(),
                    index_names.len(),
                    index_names
                )));
            }
            if values.len() != n_columns {
                return Err(Error::schema_mismatch(format!(
                    "Row {:?} has {} values, but there are {} columns.",
                    key,
                    values.len(),
                    n_columns
                )));
            }
            checked.push(Row { key, values });
        }

        Self::from_parts(index_names, columns, &checked, Attrs::default())
    }

    /// Creates a table with a single unlabeled column from `(key, value)`
    /// pairs, i.e. a time aggregated statistic.
    pub fn series<S, K>(
        index_names: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = (K, f64)>,
    ) -> Result<Self, Error>
    where
        S: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self::try_new(
            index_names,
            ColumnAxis::Series,
            rows.into_iter().map(|(key, value)| (key, vec![value])),
        )
    }

    /// Stacks the rows of the given tables.
    ///
    /// All tables must have the same row levels, in the same order, and the
    /// same column axis. The attributes of the first table are kept.
    pub fn concat<'a>(tables: impl IntoIterator<Item = &'a MetricTable>) -> Result<Self, Error> {
        let mut tables = tables.into_iter();
        let Some(first) = tables.next() else {
            return Err(Error::invalid_value("No tables to concatenate."));
        };

        let mut frame = first.frame.clone();
        for table in tables {
            if table.index_names != first.index_names {
                return Err(Error::schema_mismatch(format!(
                    "Can't concatenate tables with row levels {:?} and {:?}.",
                    first.index_names, table.index_names
                )));
            }
            if table.columns != first.columns {
                return Err(Error::schema_mismatch(format!(
                    "Can't concatenate tables with columns {:?} and {:?}.",
                    first.columns.labels(),
                    table.columns.labels()
                )));
            }
            frame.vstack_mut(&table.frame)?;
        }

        Ok(first.with_frame(frame))
    }

    /// Returns the table with the given metric name attribute.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.attrs.name = Some(name.into());
        self
    }

    /// Returns the table with the given unit attribute.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.attrs.unit = Some(unit.into());
        self
    }

    /// Creates a table without checking the rows against levels and columns.
    pub(crate) fn from_parts(
        index_names: Vec<String>,
        columns: ColumnAxis,
        rows: &[Row],
        attrs: Attrs,
    ) -> Result<Self, Error> {
        let mut series = Vec::with_capacity(index_names.len() + columns.len());
        for (pos, name) in index_names.iter().enumerate() {
            let keys = rows.iter().map(|row| row.key[pos].as_str()).collect::<Vec<_>>();
            series.push(Series::new(name, keys));
        }
        for i in 0..columns.len() {
            let values = rows.iter().map(|row| row.values[i]).collect::<Vec<_>>();
            series.push(Series::new(&value_column(i), values));
        }

        Ok(Self {
            frame: DataFrame::new(series)?,
            index_names,
            columns,
            attrs,
        })
    }

    /// Returns a table with the same levels, columns and attributes, but with
    /// the given rows.
    pub(crate) fn with_rows(&self, rows: &[Row]) -> Result<Self, Error> {
        Self::from_parts(
            self.index_names.clone(),
            self.columns.clone(),
            rows,
            self.attrs.clone(),
        )
    }

    /// Returns a table with the same levels, columns and attributes, backed by
    /// `frame`.
    ///
    /// The caller ensures that `frame` has the layout of this table.
    pub(crate) fn with_frame(&self, frame: DataFrame) -> Self {
        Self {
            frame,
            index_names: self.index_names.clone(),
            columns: self.columns.clone(),
            attrs: self.attrs.clone(),
        }
    }

    /// Returns the table with the given column axis.
    ///
    /// The caller ensures that the number of columns doesn't change.
    pub(crate) fn with_columns(mut self, columns: ColumnAxis) -> Self {
        debug_assert_eq!(columns.len(), self.columns.len());
        self.columns = columns;
        self
    }
}
