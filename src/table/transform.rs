// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Generic transformations of a [`MetricTable`]: filtering, renaming with
//! aggregation, cutoffs and reshaping.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDateTime;
use polars::prelude::{
    col, lit, when, BooleanChunked, Expr, IntoLazy, NamedFrom, Series, SortMultipleOptions,
};
use regex::Regex;

use crate::location::LocationLabel;
use crate::Error;

use super::{value_column, ColumnAxis, MetricTable, Row, VALUE_PREFIX};

impl MetricTable {
    /// Returns the rows for which the boolean expression holds.
    pub(crate) fn filter(&self, predicate: Expr) -> Result<Self, Error> {
        Ok(self.with_frame(self.lazy().filter(predicate).collect()?))
    }

    /// Returns the rows for which the predicate holds.
    pub(crate) fn filter_rows(&self, predicate: impl Fn(&Row) -> bool) -> Result<Self, Error> {
        let mask = self
            .rows()?
            .map(|row| predicate(&row))
            .collect::<BooleanChunked>();
        Ok(self.with_frame(self.frame.filter(&mask)?))
    }

    /// Returns the rows whose value in `level` satisfies the predicate.
    pub(crate) fn filter_level(
        &self,
        level: &str,
        predicate: impl Fn(&str) -> bool,
    ) -> Result<Self, Error> {
        let mask = self
            .level_values(level)?
            .map(predicate)
            .collect::<BooleanChunked>();
        Ok(self.with_frame(self.frame.filter(&mask)?))
    }

    /// Returns the rows whose value in `level` is one of `values`.
    pub fn filter_by(&self, level: &str, values: &[&str]) -> Result<Self, Error> {
        self.level_position(level)?;
        self.filter(is_one_of(level, values))
    }

    /// Returns the rows whose value in `level` is none of `values`.
    pub fn exclude_by(&self, level: &str, values: &[&str]) -> Result<Self, Error> {
        self.level_position(level)?;
        self.filter(is_one_of(level, values).not())
    }

    /// Replaces every value in `level` by `value` and sums the duplicates.
    pub fn rename_all(&self, level: &str, value: &str) -> Result<Self, Error> {
        self.level_position(level)?;
        if self.is_empty() {
            return Ok(self.clone());
        }
        self.with_exprs([lit(value).alias(level)])?.group_sum()
    }

    /// Renames the values in `level` that are keys of `mapping` and sums the
    /// duplicates. Values without a mapping are kept.
    pub fn rename_by_map<K, V>(&self, level: &str, mapping: &HashMap<K, V>) -> Result<Self, Error>
    where
        K: Borrow<str> + Hash + Eq,
        V: AsRef<str>,
    {
        self.rename_with(level, |v| {
            mapping
                .get(v)
                .map_or_else(|| v.to_string(), |m| m.as_ref().to_string())
        })
    }

    /// Renames every value in `level` with `rename` and sums the duplicates.
    pub(crate) fn rename_with(
        &self,
        level: &str,
        rename: impl Fn(&str) -> String,
    ) -> Result<Self, Error> {
        self.relabel(level, rename)?.group_sum()
    }

    /// Renames every value in `level` with `rename`, without summing
    /// duplicates.
    pub(crate) fn relabel(
        &self,
        level: &str,
        rename: impl Fn(&str) -> String,
    ) -> Result<Self, Error> {
        let mapping = self
            .unique(level)?
            .into_iter()
            .filter_map(|value| {
                let renamed = rename(value);
                (renamed != value).then(|| (value.to_string(), renamed))
            })
            .collect::<Vec<_>>();
        if mapping.is_empty() {
            return Ok(self.clone());
        }

        let renamed = mapping.into_iter().fold(col(level), |expr, (from, to)| {
            when(col(level).eq(lit(from)))
                .then(lit(to))
                .otherwise(expr)
        });
        self.with_exprs([renamed.alias(level)])
    }

    /// Sums the values of rows with equal keys.
    ///
    /// NaN values are skipped, so a group of NaN values sums to `0.0`. The
    /// result is sorted by row key.
    pub fn group_sum(&self) -> Result<Self, Error> {
        self.aggregate_duplicates(false)
    }

    /// Sums the values of rows with equal keys like
    /// [`group_sum`][MetricTable::group_sum], but a group with only NaN
    /// values stays NaN.
    pub(crate) fn merge_duplicates(&self) -> Result<Self, Error> {
        self.aggregate_duplicates(true)
    }

    fn aggregate_duplicates(&self, keep_nan: bool) -> Result<Self, Error> {
        if self.is_empty() {
            return Ok(self.clone());
        }
        let sums = self
            .value_names()
            .map(|name| {
                let sum = col(&name).fill_nan(lit(0.0)).sum();
                if keep_nan {
                    when(col(&name).is_not_nan().sum().gt(lit(0)))
                        .then(sum)
                        .otherwise(lit(f64::NAN))
                        .alias(&name)
                } else {
                    sum
                }
            })
            .collect::<Vec<_>>();
        if self.index_names.is_empty() {
            return Ok(self.with_frame(self.lazy().select(sums).collect()?));
        }

        let frame = self
            .lazy()
            .group_by(self.key_exprs())
            .agg(sums)
            .sort_by_exprs(self.key_exprs(), SortMultipleOptions::default())
            .collect()?;
        Ok(self.with_frame(frame))
    }

    /// Returns the table sorted by the full row key.
    ///
    /// The sort is stable, rows with equal keys keep their order.
    pub fn sort_index(&self) -> Result<Self, Error> {
        if self.index_names.is_empty() || self.is_empty() {
            return Ok(self.clone());
        }
        let frame = self
            .lazy()
            .sort_by_exprs(
                self.key_exprs(),
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        Ok(self.with_frame(frame))
    }

    /// Replaces every value column `c` by `f(col(c))`.
    pub(crate) fn map_columns(&self, f: impl Fn(Expr) -> Expr) -> Result<Self, Error> {
        let mapped = self
            .value_names()
            .map(|name| f(col(&name)).alias(&name))
            .collect::<Vec<_>>();
        self.with_exprs(mapped)
    }

    /// Returns the table sorted by the given row levels, keeping the order of
    /// rows with equal values in them.
    pub(crate) fn sort_by_levels(&self, levels: &[&str]) -> Result<Self, Error> {
        for level in levels {
            self.level_position(level)?;
        }
        if levels.is_empty() || self.is_empty() {
            return Ok(self.clone());
        }
        let frame = self
            .lazy()
            .sort_by_exprs(
                levels.iter().map(|level| col(level)).collect::<Vec<_>>(),
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()?;
        Ok(self.with_frame(frame))
    }

    /// Exchanges the values of two row levels in the rows where `mask` is
    /// `true`.
    pub(crate) fn swap_levels(&self, lvl0: &str, lvl1: &str, mask: &[bool]) -> Result<Self, Error> {
        self.level_position(lvl0)?;
        self.level_position(lvl1)?;
        if mask.len() != self.len() {
            return Err(Error::schema_mismatch(format!(
                "Mask has {} values, but the table has {} rows.",
                mask.len(),
                self.len()
            )));
        }

        let swap = format!("{VALUE_PREFIX}swap");
        let mut frame = self.frame.clone();
        frame.with_column(Series::new(&swap, mask))?;
        let frame = frame
            .lazy()
            .with_columns([
                when(col(&swap))
                    .then(col(lvl1))
                    .otherwise(col(lvl0))
                    .alias(lvl0),
                when(col(&swap))
                    .then(col(lvl0))
                    .otherwise(col(lvl1))
                    .alias(lvl1),
            ])
            .collect()?
            .drop(&swap)?;
        Ok(self.with_frame(frame))
    }

    /// Multiplies every value with `factor`.
    pub fn scale_values(&self, factor: f64) -> Result<Self, Error> {
        self.map_columns(|value| value * lit(factor))
    }

    /// Multiplies each column with its factor.
    pub(crate) fn scale_columns(&self, factors: &[f64]) -> Result<Self, Error> {
        let scaled = self
            .value_names()
            .zip(factors)
            .map(|(name, factor)| (col(&name) * lit(*factor)).alias(&name))
            .collect::<Vec<_>>();
        self.with_exprs(scaled)
    }

    /// Replaces values with an absolute value smaller than `|limit|` by NaN.
    ///
    /// The limit itself is not replaced, and a NaN limit replaces nothing. If
    /// `drop` is `true`, rows that only contain NaN afterwards are removed.
    pub fn apply_cutoff(&self, limit: f64, drop: bool) -> Result<Self, Error> {
        let limit = limit.abs();
        let mut frame = self.lazy();
        if !limit.is_nan() {
            let cut = self
                .value_names()
                .map(|name| {
                    when(col(&name).abs().lt(lit(limit)))
                        .then(lit(f64::NAN))
                        .otherwise(col(&name))
                        .alias(&name)
                })
                .collect::<Vec<_>>();
            frame = frame.with_columns(cut);
        }
        if drop {
            let any_value = self
                .value_names()
                .map(|name| col(&name).is_not_nan())
                .reduce(|a, b| a.or(b))
                .unwrap_or(lit(false));
            frame = frame.filter(any_value);
        }
        Ok(self.with_frame(frame.collect()?))
    }

    /// Drops all rows whose value in `level` matches the regular expression.
    pub fn drop_by_regex(&self, level: &str, pattern: &str) -> Result<Self, Error> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::invalid_value(format!("Invalid pattern '{pattern}': {e}")))?;
        self.filter_level(level, |value| !regex.is_match(value))
    }

    /// Broadcasts a single time aggregated column to a time series.
    ///
    /// Every snapshot column holds the aggregated value divided by `nhours`,
    /// i.e. the average value of one snapshot for yearly values and
    /// `nhours = 8760`.
    pub fn expand_to_time_series(
        &self,
        snapshots: &[NaiveDateTime],
        nhours: f64,
    ) -> Result<Self, Error> {
        if self.columns.len() != 1 {
            return Err(Error::invalid_value(format!(
                concat!(
                    "Broadcasting multiple columns is not supported. Only single ",
                    "column tables may be expanded, but found {} columns."
                ),
                self.columns.len()
            )));
        }

        let per_snapshot = col(&value_column(0)) / lit(nhours);
        let mut exprs = self.key_exprs();
        exprs.extend((0..snapshots.len()).map(|i| per_snapshot.clone().alias(&value_column(i))));

        Ok(Self {
            frame: self.lazy().select(exprs).collect()?,
            index_names: self.index_names.clone(),
            columns: ColumnAxis::Snapshots(snapshots.to_vec()),
            attrs: self.attrs.clone(),
        })
    }

    /// Adds the row level `name` at `position`, with `value` for all rows.
    pub fn insert_level(&self, value: &str, name: &str, position: usize) -> Result<Self, Error> {
        if self.has_level(name) {
            return Err(Error::schema_mismatch(format!(
                "Row level '{name}' already exists."
            )));
        }
        if position > self.index_names.len() {
            return Err(Error::invalid_value(format!(
                "Can't insert row level at position {}, there are only {} levels.",
                position,
                self.index_names.len()
            )));
        }

        let mut frame = self.frame.clone();
        frame.insert_column(position, Series::new(name, vec![value; self.len()]))?;
        let mut index_names = self.index_names.clone();
        index_names.insert(position, name.to_string());

        Ok(Self {
            frame,
            index_names,
            columns: self.columns.clone(),
            attrs: self.attrs.clone(),
        })
    }

    /// Splits a level with combined labels like `"AT0 1 solar"` into a
    /// location level and a carrier level.
    ///
    /// Labels without a location prefix get an empty location, and the whole
    /// label becomes the carrier.
    pub fn split_location_carrier(
        &self,
        level: &str,
        location_name: &str,
        carrier_name: &str,
    ) -> Result<Self, Error> {
        let pos = self.level_position(level)?;
        if location_name == carrier_name
            || self
                .index_names
                .iter()
                .enumerate()
                .any(|(i, n)| i != pos && (n == location_name || n == carrier_name))
        {
            return Err(Error::schema_mismatch(format!(
                "Can't split '{level}' into already existing levels '{location_name}', '{carrier_name}'."
            )));
        }

        let (locations, carriers): (Vec<String>, Vec<String>) = self
            .level_values(level)?
            .map(|raw| {
                let label = LocationLabel::parse(raw);
                (label.location, label.carrier)
            })
            .unzip();

        let mut frame = self.frame.drop(level)?;
        frame.insert_column(pos, Series::new(location_name, locations))?;
        frame.insert_column(pos + 1, Series::new(carrier_name, carriers))?;

        let mut index_names = self.index_names.clone();
        index_names.splice(
            pos..=pos,
            [location_name.to_string(), carrier_name.to_string()],
        );

        Ok(Self {
            frame,
            index_names,
            columns: self.columns.clone(),
            attrs: self.attrs.clone(),
        })
    }

    fn with_exprs(&self, exprs: impl AsRef<[Expr]>) -> Result<Self, Error> {
        Ok(self.with_frame(self.lazy().with_columns(exprs).collect()?))
    }
}

/// Matches the rows whose value in `level` is one of `values`.
fn is_one_of(level: &str, values: &[&str]) -> Expr {
    values
        .iter()
        .map(|value| col(level).eq(lit(*value)))
        .reduce(|a, b| a.or(b))
        .unwrap_or(lit(false))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use crate::table::test_utils::{assert_tables_close, snapshots, TableBuilder};
    use crate::{ColumnAxis, Error, ErrorKind};

    fn multi_index() -> TableBuilder {
        TableBuilder::new(["idx1", "idx2"])
            .metric("col (MW)")
            .row(["A", "1"], 0.0)
            .row(["A", "2"], 1.0)
            .row(["A", "3"], 2.0)
            .row(["B", "1"], 3.0)
            .row(["B", "2"], 4.0)
            .row(["B", "3"], 5.0)
    }

    #[test]
    fn test_filter_by() -> Result<(), Error> {
        let table = multi_index().build()?;

        let result = table.filter_by("idx2", &["1", "3"])?;
        let expected = TableBuilder::new(["idx1", "idx2"])
            .metric("col (MW)")
            .row(["A", "1"], 0.0)
            .row(["A", "3"], 2.0)
            .row(["B", "1"], 3.0)
            .row(["B", "3"], 5.0)
            .build()?;
        assert_eq!(result, expected);

        let result = table.exclude_by("idx1", &["A"])?;
        assert_eq!(result.unique("idx1")?, vec!["B"]);
        assert_eq!(result.len(), 3);

        assert!(table.filter_by("idx2", &[])?.is_empty());
        assert!(table
            .filter_by("idx3", &["1"])
            .is_err_and(|e| e.kind() == ErrorKind::MissingKey));

        Ok(())
    }

    #[test]
    fn test_rename_and_aggregate() -> Result<(), Error> {
        let table = multi_index().build()?;

        let mapping = HashMap::from([("A", "C"), ("B", "C")]);
        let result = table.rename_by_map("idx1", &mapping)?;
        let expected = TableBuilder::new(["idx1", "idx2"])
            .metric("col (MW)")
            .row(["C", "1"], 3.0)
            .row(["C", "2"], 5.0)
            .row(["C", "3"], 7.0)
            .build()?;
        assert_eq!(result, expected);

        let result = table.rename_all("idx2", "all")?;
        let expected = TableBuilder::new(["idx1", "idx2"])
            .metric("col (MW)")
            .row(["A", "all"], 3.0)
            .row(["B", "all"], 12.0)
            .build()?;
        assert_eq!(result, expected);

        // unmapped values are kept
        let mapping = HashMap::from([("A".to_string(), "Z".to_string())]);
        let result = table.rename_by_map("idx1", &mapping)?;
        assert_eq!(result.unique("idx1")?, vec!["B", "Z"]);

        Ok(())
    }

    #[test]
    fn test_group_sum_skips_nan() -> Result<(), Error> {
        let table = TableBuilder::new(["location"])
            .row(["AT"], f64::NAN)
            .row(["DE"], 1.0)
            .row(["AT"], f64::NAN)
            .row(["DE"], f64::NAN)
            .build()?;

        let result = table.group_sum()?;
        let expected = TableBuilder::new(["location"])
            .row(["AT"], 0.0)
            .row(["DE"], 1.0)
            .build()?;
        assert_eq!(result, expected);

        Ok(())
    }

    #[test]
    fn test_merge_duplicates_keeps_nan() -> Result<(), Error> {
        let table = TableBuilder::new(["location"])
            .row(["DE"], 1.0)
            .row(["AT"], f64::NAN)
            .row(["DE"], f64::NAN)
            .row(["AT"], f64::NAN)
            .build()?;

        let result = table.merge_duplicates()?;
        let expected = TableBuilder::new(["location"])
            .row(["AT"], f64::NAN)
            .row(["DE"], 1.0)
            .build()?;
        assert_tables_close(&result, &expected);

        Ok(())
    }

    #[test]
    fn test_apply_cutoff() -> Result<(), Error> {
        let table = TableBuilder::new(["idx"])
            .columns(ColumnAxis::Labels(vec!["A".into(), "B".into()]))
            .row_values(["1"], vec![0.1, -1.0])
            .row_values(["2"], vec![0.5, -0.05])
            .row_values(["3"], vec![0.0, 0.0])
            .build()?;

        let result = table.apply_cutoff(0.1, true)?;
        let expected = TableBuilder::new(["idx"])
            .columns(ColumnAxis::Labels(vec!["A".into(), "B".into()]))
            .row_values(["1"], vec![0.1, -1.0])
            .row_values(["2"], vec![0.5, f64::NAN])
            .build()?;
        assert_tables_close(&result, &expected);

        let result = table.apply_cutoff(0.1, false)?;
        assert_eq!(result.len(), 3);
        assert!(result.get(&["3"])?.is_some_and(|v| v.iter().all(|x| x.is_nan())));

        assert_tables_close(&table.apply_cutoff(f64::NAN, true)?, &table);
        assert!(table.apply_cutoff(f64::INFINITY, true)?.is_empty());

        Ok(())
    }

    #[test]
    fn test_drop_by_regex() -> Result<(), Error> {
        let table = TableBuilder::new(["carrier"])
            .row(["H2 pipeline"], 1.0)
            .row(["H2 pipeline retrofitted"], 2.0)
            .row(["gas pipeline"], 3.0)
            .build()?;

        let result = table.drop_by_regex("carrier", r"^H2 pipeline")?;
        assert!(result.level_values("carrier")?.eq(["gas pipeline"]));

        assert!(table
            .drop_by_regex("carrier", r"(")
            .is_err_and(|e| e.kind() == ErrorKind::InvalidValue));

        Ok(())
    }

    #[test]
    fn test_expand_to_time_series() -> Result<(), Error> {
        let table = TableBuilder::new(["location"])
            .metric("Demand (MWh)")
            .row(["AT"], 8760.0)
            .row(["DE"], 17520.0)
            .name("Demand")
            .build()?;

        let snapshots = snapshots(3);
        let result = table.expand_to_time_series(&snapshots, 8760.0)?;
        let expected = TableBuilder::new(["location"])
            .columns(ColumnAxis::Snapshots(snapshots.clone()))
            .row_values(["AT"], vec![1.0, 1.0, 1.0])
            .row_values(["DE"], vec![2.0, 2.0, 2.0])
            .name("Demand")
            .build()?;
        assert_eq!(result, expected);

        let two_columns = TableBuilder::new(["location"])
            .columns(ColumnAxis::Labels(vec!["a".into(), "b".into()]))
            .row_values(["AT"], vec![1.0, 2.0])
            .build()?;
        assert!(two_columns
            .expand_to_time_series(&snapshots, 8760.0)
            .is_err_and(|e| e.kind() == ErrorKind::InvalidValue));

        Ok(())
    }

    #[test]
    fn test_insert_level() -> Result<(), Error> {
        let table = TableBuilder::new(["location", "carrier"])
            .row(["AT", "solar"], 1.0)
            .build()?;

        let result = table.insert_level("2030", "year", 0)?;
        assert_eq!(result.index_names(), ["year", "location", "carrier"]);
        assert_eq!(result.get(&["2030", "AT", "solar"])?, Some(vec![1.0]));

        let result = table.insert_level("AC", "bus_carrier", 2)?;
        assert_eq!(result.index_names(), ["location", "carrier", "bus_carrier"]);

        assert!(table
            .insert_level("x", "carrier", 0)
            .is_err_and(|e| e.kind() == ErrorKind::SchemaMismatch));
        assert!(table
            .insert_level("x", "year", 3)
            .is_err_and(|e| e.kind() == ErrorKind::InvalidValue));

        Ok(())
    }

    #[test]
    fn test_split_location_carrier() -> Result<(), Error> {
        let table = TableBuilder::new(["year", "name"])
            .row(["2030", "AT0 1 solar"], 1.0)
            .row(["2030", "AT0 0"], 2.0)
            .row(["2030", "CH4"], 3.0)
            .row(["2030", ""], 4.0)
            .row(["2030", "EU gas"], 5.0)
            .build()?;

        let result = table.split_location_carrier("name", "location", "carrier")?;
        let expected = TableBuilder::new(["year", "location", "carrier"])
            .row(["2030", "AT0 1", "solar"], 1.0)
            .row(["2030", "AT0 0", ""], 2.0)
            .row(["2030", "", "CH4"], 3.0)
            .row(["2030", "", ""], 4.0)
            .row(["2030", "", "EU gas"], 5.0)
            .build()?;
        assert_eq!(result, expected);

        assert!(table
            .split_location_carrier("name", "year", "carrier")
            .is_err_and(|e| e.kind() == ErrorKind::SchemaMismatch));

        Ok(())
    }
}
