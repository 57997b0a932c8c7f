// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Combination of raw statistics into a validated metric.

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::{lit, when};

use crate::carriers::{NET_EXPORT, NET_IMPORT, SALDO};
use crate::table::SNAPSHOT_FORMAT;
use crate::{
    aggregate_locations, scale, verify, AggregationConfig, ColumnAxis, Dimension, Error,
    MetricTable,
};

const CARRIER: &str = Dimension::Carrier.as_str();

/// Formats accepted for snapshot column labels.
const SNAPSHOT_FORMATS: [&str; 3] = [SNAPSHOT_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Builds a metric from the statistics of one or more networks.
///
/// The statistics are stacked, aggregated to countries and `EU` as configured
/// in `config`, converted from `is_unit` to `to_unit` and checked with
/// [`verify`]. Statistics with a single unlabeled column become a metric
/// column labeled `"<metric_name> (<is_unit>)"`. Statistics with labeled
/// columns are time series, and their labels are parsed as snapshots.
///
/// An empty `to_unit` keeps the values in `is_unit`.
pub fn combine_statistics(
    statistics: &[MetricTable],
    metric_name: &str,
    is_unit: &str,
    to_unit: &str,
    config: &AggregationConfig,
) -> Result<MetricTable, Error> {
    let mut table = MetricTable::concat(statistics)?;

    if matches!(table.columns(), ColumnAxis::Series) {
        table = table.with_columns(ColumnAxis::Metric(vec![format!(
            "{metric_name} ({is_unit})"
        )]));
    }

    let table = aggregate_locations(&table, config)?
        .with_name(metric_name)
        .with_unit(is_unit);

    let mut table = match table.columns() {
        ColumnAxis::Labels(labels) => {
            let snapshots = labels
                .iter()
                .map(|label| parse_snapshot(label))
                .collect::<Result<Vec<_>, _>>()?;
            table.with_columns(ColumnAxis::Snapshots(snapshots))
        }
        _ => table,
    };

    if !to_unit.is_empty() && to_unit != is_unit {
        table = scale(&table, to_unit)?;
    }

    let table = split_trade_saldo(&table)?;

    tracing::debug!(
        "Combined {} statistics into '{}' with {} rows.",
        statistics.len(),
        metric_name,
        table.len()
    );

    verify(&table)?;

    Ok(table)
}

fn parse_snapshot(label: &str) -> Result<NaiveDateTime, Error> {
    SNAPSHOT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(label, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(label, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| {
            Error::invalid_value(format!("Can't parse column label '{label}' as a snapshot."))
        })
}

/// Splits net trade balances into imports and exports.
///
/// Every carrier that contains `saldo` is replaced by a `Net Import` carrier
/// with its positive values, and a `Net Export` carrier with the others.
/// Tables without a carrier level are returned unchanged.
///
/// Balances must be split after locations were aggregated, otherwise the
/// balances of the merged regions don't net out.
pub fn split_trade_saldo(table: &MetricTable) -> Result<MetricTable, Error> {
    if !table.has_level(CARRIER) {
        return Ok(table.clone());
    }

    let saldo = table.filter_level(CARRIER, |carrier| carrier.contains(SALDO))?;
    if saldo.is_empty() {
        return Ok(table.clone());
    }
    let rest = table.filter_level(CARRIER, |carrier| !carrier.contains(SALDO))?;

    let net_import = saldo
        .map_columns(|value| when(value.clone().gt(lit(0.0))).then(value).otherwise(lit(0.0)))?
        .rename_all(CARRIER, NET_IMPORT)?;
    let net_export = saldo
        .map_columns(|value| when(value.clone().gt(lit(0.0))).then(lit(0.0)).otherwise(value))?
        .rename_all(CARRIER, NET_EXPORT)?;

    MetricTable::concat([&rest, &net_import, &net_export])?.sort_index()
}
