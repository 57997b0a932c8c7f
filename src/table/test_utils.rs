// License: MIT
// Copyright © 2024 esm-metrics contributors

//! This module is only compiled when running unit tests and contains features
//! that are shared by all tests of the crate.
//!
//! - the `TableBuilder`, which can declaratively build metric tables for use
//!   in tests.
//! - helpers for comparing floating point values and tables that may contain
//!   NaN.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::{ColumnAxis, Error, MetricTable};

/// Builds [`MetricTable`]s row by row.
pub(crate) struct TableBuilder {
    index_names: Vec<String>,
    columns: ColumnAxis,
    rows: Vec<(Vec<String>, Vec<f64>)>,
    name: Option<String>,
    unit: Option<String>,
}

impl TableBuilder {
    /// Creates a builder for a series with the given row levels.
    pub(crate) fn new<S: Into<String>>(index_names: impl IntoIterator<Item = S>) -> Self {
        Self {
            index_names: index_names.into_iter().map(Into::into).collect(),
            columns: ColumnAxis::Series,
            rows: vec![],
            name: None,
            unit: None,
        }
    }

    /// Uses a single metric column with the given label.
    pub(crate) fn metric(mut self, label: &str) -> Self {
        self.columns = ColumnAxis::Metric(vec![label.to_string()]);
        self
    }

    /// Uses the given column axis.
    pub(crate) fn columns(mut self, columns: ColumnAxis) -> Self {
        self.columns = columns;
        self
    }

    /// Adds a row with a single value.
    pub(crate) fn row<const N: usize>(self, key: [&str; N], value: f64) -> Self {
        self.row_values(key, vec![value])
    }

    /// Adds a row with one value per column.
    pub(crate) fn row_values<const N: usize>(mut self, key: [&str; N], values: Vec<f64>) -> Self {
        self.rows
            .push((key.iter().map(|k| k.to_string()).collect(), values));
        self
    }

    pub(crate) fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub(crate) fn unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub(crate) fn build(self) -> Result<MetricTable, Error> {
        let mut table = MetricTable::try_new(self.index_names, self.columns, self.rows)?;
        if let Some(name) = self.name {
            table = table.with_name(name);
        }
        if let Some(unit) = self.unit {
            table = table.with_unit(unit);
        }
        Ok(table)
    }
}

/// Returns `n` hourly snapshots, starting at 2030-01-01 00:00.
pub(crate) fn snapshots(n: usize) -> Vec<NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(2030, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap();
    (0..n)
        .map(|i| start + Duration::hours(i as i64))
        .collect()
}

/// Returns `true` if both values are NaN, or if they are equal within a
/// relative tolerance.
pub(crate) fn is_close(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// Asserts that two tables have the same levels, columns, attributes and
/// keys, and that their values are close.
pub(crate) fn assert_tables_close(actual: &MetricTable, expected: &MetricTable) {
    assert_eq!(actual.index_names(), expected.index_names());
    assert_eq!(actual.columns(), expected.columns());
    assert_eq!(actual.attrs(), expected.attrs());
    assert_eq!(actual.len(), expected.len(), "{actual:?} != {expected:?}");
    let actual_rows = actual.rows().expect("rows of the actual table");
    let expected_rows = expected.rows().expect("rows of the expected table");
    for (a, e) in actual_rows.zip(expected_rows) {
        assert_eq!(a.key(), e.key());
        assert!(
            a.values()
                .iter()
                .zip(e.values())
                .all(|(x, y)| is_close(*x, *y)),
            "{:?}: {:?} != {:?}",
            a.key(),
            a.values(),
            e.values()
        );
    }
}
