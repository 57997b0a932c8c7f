// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Methods for retrieving rows, levels and attributes from a [`MetricTable`].

use std::collections::BTreeSet;

use polars::prelude::{col, lit};

use crate::iterators::{LevelValues, Rows};
use crate::Error;

use super::{value_column, Attrs, ColumnAxis, MetricTable};

/// Row, level and attribute retrieval.
impl MetricTable {
    /// Returns the names of the row levels.
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }

    /// Returns the column axis.
    pub fn columns(&self) -> &ColumnAxis {
        &self.columns
    }

    /// Returns the attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Returns the metric name attribute, if set.
    pub fn name(&self) -> Option<&str> {
        self.attrs.name.as_deref()
    }

    /// Returns the unit attribute, if set.
    pub fn unit(&self) -> Option<&str> {
        self.attrs.unit.as_deref()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the rows.
    pub fn rows(&self) -> Result<Rows, Error> {
        Ok(Rows {
            iter: self.collect_rows()?.into_iter(),
        })
    }

    /// Returns `true` if the table has a row level with the given name.
    pub fn has_level(&self, level: &str) -> bool {
        self.index_names.iter().any(|n| n == level)
    }

    /// Returns the position of the given row level in the row keys.
    pub fn level_position(&self, level: &str) -> Result<usize, Error> {
        self.index_names
            .iter()
            .position(|n| n == level)
            .ok_or_else(|| {
                Error::missing_key(format!(
                    "Row level '{}' not found in {:?}.",
                    level, self.index_names
                ))
            })
    }

    /// Returns an iterator over the values of the given row level.
    pub fn level_values(&self, level: &str) -> Result<LevelValues, Error> {
        self.level_position(level)?;
        Ok(LevelValues {
            column: self.level_column(level)?,
            next: 0,
        })
    }

    /// Returns the sorted, distinct values of the given row level.
    pub fn unique(&self, level: &str) -> Result<Vec<&str>, Error> {
        Ok(self
            .level_values(level)?
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    /// Returns the values of the first row with the given key.
    pub fn get(&self, key: &[&str]) -> Result<Option<Vec<f64>>, Error> {
        if key.len() != self.index_names.len() {
            return Ok(None);
        }
        let predicate = self
            .index_names
            .iter()
            .zip(key)
            .map(|(level, value)| col(level).eq(lit(*value)))
            .reduce(|a, b| a.and(b))
            .unwrap_or(lit(true));

        let found = self.filter(predicate)?;
        Ok(found.collect_rows()?.into_iter().next().map(|row| row.values))
    }

    /// Returns the sum of a column, skipping NaN values.
    pub fn column_total(&self, column: usize) -> Result<f64, Error> {
        if column >= self.columns.len() {
            return Err(Error::missing_key(format!(
                "Column {column} not found, there are {} columns.",
                self.columns.len()
            )));
        }
        let name = value_column(column);
        let total = self
            .lazy()
            .select([col(&name).fill_nan(lit(0.0)).sum()])
            .collect()?;
        Ok(total.column(&name)?.f64()?.get(0).unwrap_or(0.0))
    }
}
