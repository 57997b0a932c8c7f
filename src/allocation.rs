// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Attribution of the withdrawal of multi-output conversion technologies to
//! their outputs.

use std::collections::{BTreeMap, BTreeSet};

use crate::carriers::{AMBIENT_HEAT, LATENT_HEAT};
use crate::table::Row;
use crate::{Dimension, Error, MetricTable};

const LOCATION: &str = Dimension::Location.as_str();
const CARRIER: &str = Dimension::Carrier.as_str();
const BUS_CARRIER: &str = Dimension::BusCarrier.as_str();

/// Sums the values, skipping NaN.
///
/// Returns `0.0` if there are no values, or all of them are NaN.
fn nansum(values: impl IntoIterator<Item = f64>) -> f64 {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(0.0, |acc, v| acc + v)
}

/// The legs of one technology, i.e. all rows that only differ in their bus
/// carrier.
struct Group<'a> {
    key: Vec<&'a str>,
    legs: Vec<&'a Row>,
}

/// The balance of a group in one column.
struct Balance {
    withdrawal: f64,
    /// The ratio of supply to withdrawal.
    factor: f64,
    /// The part of the supply that goes to the requested bus carriers.
    share: f64,
}

impl Balance {
    fn new(legs: &[&Row], column: usize, is_requested: impl Fn(&Row) -> bool) -> Self {
        let values = || legs.iter().map(|row| (*row, row.values()[column]));
        let withdrawal = nansum(values().filter(|&(_, v)| v < 0.0).map(|(_, v)| v));
        let supply = nansum(values().filter(|&(_, v)| v >= 0.0).map(|(_, v)| v));
        let requested = nansum(
            values()
                .filter(|&(row, v)| v >= 0.0 && is_requested(row))
                .map(|(_, v)| v),
        );
        Self {
            withdrawal,
            factor: (supply / withdrawal).abs(),
            share: requested / supply,
        }
    }

    /// Returns `true` if more energy leaves the technology than is metered
    /// going in.
    fn has_surplus(&self) -> bool {
        self.factor > 1.0
    }

    /// Returns the share of a withdrawal leg attributable to the requested
    /// bus carriers.
    fn allocate(&self, value: f64) -> f64 {
        if self.has_surplus() {
            value * self.share
        } else {
            value * self.factor * self.share
        }
    }

    /// Returns the share of the unmetered inflow attributable to the
    /// requested bus carriers.
    fn surplus(&self) -> f64 {
        if self.has_surplus() {
            self.withdrawal * (self.factor - 1.0) * self.share
        } else {
            f64::NAN
        }
    }
}

/// Calculates the withdrawal that is necessary to supply the given bus
/// carriers.
///
/// Rows are grouped by all row levels except `bus_carrier`, so that each group
/// holds the legs of one technology. Negative legs are withdrawals, and
/// non-negative legs are supply. In every group and column:
///
/// - the `factor` is the ratio of supply to withdrawal.
/// - the `share` is the part of the supply that goes to `bus_carriers`.
/// - each withdrawal leg is attributed with `withdrawal * factor * share`.
///
/// If the supply exceeds the withdrawal, e.g. because a heat pump draws
/// ambient heat, the difference is added as an extra withdrawal leg, with the
/// bus carrier `ambient heat` for heat pumps and `latent heat` otherwise.
/// Withdrawal legs are then attributed with `withdrawal * share`.
///
/// The result contains the withdrawal legs and surplus legs of every group as
/// positive values. Values are NaN where a leg doesn't withdraw, and where the
/// share is undefined because the group has no supply. A group without any
/// withdrawal keeps its legs with NaN values.
pub fn calculate_input_share(
    table: &MetricTable,
    bus_carriers: &[&str],
) -> Result<MetricTable, Error> {
    let bc_pos = table.level_position(BUS_CARRIER)?;
    let carrier_pos = table.level_position(CARRIER).ok();
    let n_columns = table.columns().len();

    let legs = table.collect_rows()?;
    let mut groups: BTreeMap<Vec<&str>, Group> = BTreeMap::new();
    for row in &legs {
        let key = row
            .key()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != bc_pos)
            .map(|(_, k)| k.as_str())
            .collect::<Vec<_>>();
        groups
            .entry(key.clone())
            .or_insert_with(|| Group { key, legs: vec![] })
            .legs
            .push(row);
    }

    let is_requested = |row: &Row| bus_carriers.contains(&row.key()[bc_pos].as_str());

    let mut allocated = Vec::new();
    for group in groups.values() {
        let withdrawing = group
            .legs
            .iter()
            .filter(|row| row.values().iter().any(|v| *v < 0.0))
            .collect::<Vec<_>>();

        if withdrawing.is_empty() {
            allocated.extend(group.legs.iter().map(|row| Row {
                key: row.key.clone(),
                values: vec![f64::NAN; n_columns],
            }));
            continue;
        }

        let balances = (0..n_columns)
            .map(|column| Balance::new(&group.legs, column, is_requested))
            .collect::<Vec<_>>();

        for row in withdrawing {
            let values = row
                .values()
                .iter()
                .zip(&balances)
                .map(|(v, balance)| {
                    if *v < 0.0 {
                        -balance.allocate(*v)
                    } else {
                        f64::NAN
                    }
                })
                .collect();
            allocated.push(Row {
                key: row.key.clone(),
                values,
            });
        }

        if balances.iter().any(Balance::has_surplus) {
            let carrier = carrier_pos.map_or("", |pos| group.key[pos - usize::from(pos > bc_pos)]);
            let mut key = group.key.iter().map(|k| k.to_string()).collect::<Vec<_>>();
            key.insert(bc_pos, surplus_bus_carrier(carrier).to_string());
            allocated.push(Row {
                key,
                values: balances.iter().map(|b| -b.surplus()).collect(),
            });
        }
    }

    tracing::debug!(
        "Allocated the withdrawal of {} technologies to {:?}.",
        groups.len(),
        bus_carriers
    );

    table.with_rows(&allocated)
}

/// Names the unmetered inflow of a technology.
///
/// Only the carrier name is checked, so every carrier containing `heat pump`
/// is assumed to draw ambient heat.
fn surplus_bus_carrier(carrier: &str) -> &'static str {
    if carrier.contains("heat pump") {
        AMBIENT_HEAT
    } else {
        LATENT_HEAT
    }
}

/// Returns the rows of all technologies that are connected to one of the
/// given bus carriers.
///
/// A technology, i.e. a `(location, carrier)` pair, is connected if it has a
/// non-zero value on one of `bus_carriers`.
pub fn filter_for_carrier_connected_to(
    table: &MetricTable,
    bus_carriers: &[&str],
) -> Result<MetricTable, Error> {
    let loc_pos = table.level_position(LOCATION)?;
    let carrier_pos = table.level_position(CARRIER)?;
    let bc_pos = table.level_position(BUS_CARRIER)?;

    let connected = table
        .rows()?
        .filter(|row| {
            bus_carriers.contains(&row.key()[bc_pos].as_str())
                && row.values().iter().any(|v| *v != 0.0 && !v.is_nan())
        })
        .map(|row| (row.key[loc_pos].clone(), row.key[carrier_pos].clone()))
        .collect::<BTreeSet<_>>();

    table.filter_rows(|row| {
        connected.contains(&(row.key()[loc_pos].clone(), row.key()[carrier_pos].clone()))
    })
}
