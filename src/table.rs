// License: MIT
// Copyright © 2024 esm-metrics contributors

//! A labeled, multi-dimensional table of metric values.

mod creation;
pub mod iterators;
mod retrieval;
mod transform;

#[cfg(test)]
pub(crate) mod test_utils;

use chrono::NaiveDateTime;
use polars::prelude::{col, DataFrame, Expr, Float64Chunked, IntoLazy, LazyFrame, StringChunked};

use crate::dimension::{METRIC, SNAPSHOTS};
use crate::Error;

/// Format used to print snapshot column labels.
pub(crate) const SNAPSHOT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prefix of the frame columns that hold values. Row levels may not use it.
pub(crate) const VALUE_PREFIX: &str = "__value_";

/// Returns the name of the frame column holding the values of column `i`.
pub(crate) fn value_column(i: usize) -> String {
    format!("{VALUE_PREFIX}{i}")
}

/// The composite key of a row, one value per row level.
pub type RowKey = Vec<String>;

/// The column axis of a [`MetricTable`].
///
/// Validated metrics have either a single [`Metric`][ColumnAxis::Metric]
/// column or [`Snapshots`][ColumnAxis::Snapshots]. The other two variants only
/// occur in raw statistics, before they are combined into a metric.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnAxis {
    /// A single unlabeled column holding a time aggregated statistic.
    Series,
    /// Column labels whose kind has not been determined yet.
    Labels(Vec<String>),
    /// Time aggregated columns, labeled `"<name> (<unit>)"`.
    Metric(Vec<String>),
    /// One column per snapshot.
    Snapshots(Vec<NaiveDateTime>),
}

impl ColumnAxis {
    /// Returns the number of value columns.
    pub fn len(&self) -> usize {
        match self {
            ColumnAxis::Series => 1,
            ColumnAxis::Labels(labels) | ColumnAxis::Metric(labels) => labels.len(),
            ColumnAxis::Snapshots(snapshots) => snapshots.len(),
        }
    }

    /// Returns `true` if there are no value columns.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the name of the axis, if its kind is known.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            ColumnAxis::Metric(_) => Some(METRIC),
            ColumnAxis::Snapshots(_) => Some(SNAPSHOTS),
            ColumnAxis::Series | ColumnAxis::Labels(_) => None,
        }
    }

    /// Returns the column labels as strings.
    ///
    /// Snapshots are formatted as `%Y-%m-%d %H:%M:%S`, a series has a single
    /// empty label.
    pub fn labels(&self) -> Vec<String> {
        match self {
            ColumnAxis::Series => vec![String::new()],
            ColumnAxis::Labels(labels) | ColumnAxis::Metric(labels) => labels.clone(),
            ColumnAxis::Snapshots(snapshots) => snapshots
                .iter()
                .map(|s| s.format(SNAPSHOT_FORMAT).to_string())
                .collect(),
        }
    }
}

/// Attributes that travel with a [`MetricTable`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs {
    pub name: Option<String>,
    pub unit: Option<String>,
}

/// A row of a [`MetricTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub(crate) key: RowKey,
    pub(crate) values: Vec<f64>,
}

impl Row {
    /// Returns the composite row key.
    pub fn key(&self) -> &[String] {
        &self.key
    }

    /// Returns the values of the row, one per column.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// A labeled table of metric values.
///
/// Rows are identified by a composite key with one value per row level, e.g.
/// `("2030", "AT0 1", "solar", "AC")` for the levels
/// `("year", "location", "carrier", "bus_carrier")`. Keys may repeat until
/// duplicates are summed with [`group_sum`][MetricTable::group_sum].
///
/// The rows are stored in a polars [`DataFrame`] with one string column per
/// row level, named like the level, followed by one `f64` column per value
/// column. The column axis and the attributes are kept next to the frame.
///
/// All transformations take `&self` and return a new table.
#[derive(Clone, Debug)]
pub struct MetricTable {
    frame: DataFrame,
    index_names: Vec<String>,
    columns: ColumnAxis,
    attrs: Attrs,
}

impl MetricTable {
    fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// Returns one `col` expression per row level.
    fn key_exprs(&self) -> Vec<Expr> {
        self.index_names.iter().map(|name| col(name)).collect()
    }

    /// Returns the names of the frame columns that hold values.
    fn value_names(&self) -> impl Iterator<Item = String> {
        (0..self.columns.len()).map(value_column)
    }

    fn level_column(&self, level: &str) -> Result<&StringChunked, Error> {
        Ok(self.frame.column(level)?.str()?)
    }

    fn value_columns(&self) -> Result<Vec<&Float64Chunked>, Error> {
        (0..self.columns.len())
            .map(|i| -> Result<_, Error> { Ok(self.frame.column(&value_column(i))?.f64()?) })
            .collect()
    }

    /// Reads the rows out of the frame.
    pub(crate) fn collect_rows(&self) -> Result<Vec<Row>, Error> {
        let levels = self
            .index_names
            .iter()
            .map(|level| self.level_column(level))
            .collect::<Result<Vec<_>, _>>()?;
        let values = self.value_columns()?;

        Ok((0..self.frame.height())
            .map(|i| Row {
                key: levels
                    .iter()
                    .map(|ca| ca.get(i).unwrap_or_default().to_string())
                    .collect(),
                values: values.iter().map(|ca| ca.get(i).unwrap_or(f64::NAN)).collect(),
            })
            .collect())
    }
}

/// Tables are equal if their levels, columns, attributes and rows are equal.
/// Like `f64`, a table with NaN values is not equal to itself.
impl PartialEq for MetricTable {
    fn eq(&self, other: &Self) -> bool {
        self.index_names == other.index_names
            && self.columns == other.columns
            && self.attrs == other.attrs
            && matches!(
                (self.collect_rows(), other.collect_rows()),
                (Ok(a), Ok(b)) if a == b
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_column_axis() {
        let snapshot = NaiveDate::from_ymd_opt(2030, 1, 1)
            .and_then(|d| d.and_hms_opt(3, 0, 0))
            .unwrap();
        let axis = ColumnAxis::Snapshots(vec![snapshot]);
        assert_eq!(axis.len(), 1);
        assert_eq!(axis.name(), Some("snapshots"));
        assert_eq!(axis.labels(), vec!["2030-01-01 03:00:00".to_string()]);

        assert_eq!(ColumnAxis::Series.len(), 1);
        assert_eq!(ColumnAxis::Series.name(), None);
        assert!(ColumnAxis::Metric(vec![]).is_empty());
        assert_eq!(
            ColumnAxis::Metric(vec!["Test (MW)".into()]).name(),
            Some("metric")
        );
    }
}
