// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Parsing of units from labels, and conversion of metric tables between
//! units of the same physical quantity.

use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{ColumnAxis, Error, MetricTable};

/// Anything inside a pair of parentheses that contains no parentheses.
static UNIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([^()]*\)").expect("valid unit pattern"));

/// Qualifiers that may follow a unit, e.g. `MWh_th`. They are kept, but not
/// scaled.
const SUFFIXES: [&str; 3] = ["th", "el", "LHV"];

/// The physical quantity measured by a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantity {
    Power,
    Energy,
    Currency,
    Mass,
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quantity::Power => write!(f, "power"),
            Quantity::Energy => write!(f, "energy"),
            Quantity::Currency => write!(f, "currency"),
            Quantity::Mass => write!(f, "mass"),
        }
    }
}

/// A known unit symbol.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitSymbol {
    /// The scale relative to the base unit of the quantity, i.e. `MW`, `MWh`,
    /// `EUR` or `t`.
    pub factor: f64,
    pub quantity: Quantity,
}

impl UnitSymbol {
    /// Looks up a unit symbol, e.g. `"GWh"` or `"t_co2"`.
    pub fn lookup(symbol: &str) -> Option<Self> {
        use Quantity::*;

        let (factor, quantity) = match symbol {
            "W" => (1e-6, Power),
            "Wh" => (1e-6, Energy),
            "kW" | "KW" => (1e-3, Power),
            "kWh" | "KWh" => (1e-3, Energy),
            "MW" => (1.0, Power),
            "MWh" => (1.0, Energy),
            "GW" => (1e3, Power),
            "GWh" => (1e3, Energy),
            "TW" => (1e6, Power),
            "TWh" => (1e6, Energy),
            "PW" => (1e9, Power),
            "PWh" => (1e9, Energy),
            "EUR" | "currency" => (1.0, Currency),
            "t" | "t_co2" => (1.0, Mass),
            "kt_co2" => (1e3, Mass),
            "Mt_co2" => (1e6, Mass),
            _ => return None,
        };
        Some(Self { factor, quantity })
    }

    fn try_lookup(symbol: &str) -> Result<Self, Error> {
        Self::lookup(symbol)
            .ok_or_else(|| Error::missing_key(format!("Unknown unit symbol: '{symbol}'.")))
    }
}

/// Returns the unit inside the last pair of parentheses in `label`, or an
/// empty string if there is none.
///
/// If `ignore_suffix` is `true`, a trailing `_<suffix>` is stripped, e.g.
/// `"Heat (MWh_th)"` gives `"MWh"`.
pub fn get_unit(label: &str, ignore_suffix: bool) -> String {
    let Some(m) = UNIT.find_iter(label).last() else {
        return String::new();
    };
    let unit = m.as_str().trim_start_matches('(').trim_end_matches(')');
    match unit.rsplit_once('_') {
        Some((base, _)) if ignore_suffix => base.to_string(),
        _ => unit.to_string(),
    }
}

/// Splits a known qualifier off a unit, e.g. `"MWh_th"` into `("MWh",
/// Some("th"))`. Underscores that are part of the symbol, like in `t_co2`,
/// are left alone.
pub(crate) fn split_suffix(unit: &str) -> (&str, Option<&str>) {
    match unit.rsplit_once('_') {
        Some((base, suffix)) if SUFFIXES.contains(&suffix) => (base, Some(suffix)),
        _ => (unit, None),
    }
}

fn with_suffix(base: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(suffix) => format!("{base}_{suffix}"),
        None => base.to_string(),
    }
}

/// Returns the factor that converts values from `from` to `to`.
///
/// Fails if the units measure different quantities, e.g. power and energy.
fn conversion_factor(from: &str, to: &str) -> Result<f64, Error> {
    let source = UnitSymbol::try_lookup(from)?;
    let target = UnitSymbol::try_lookup(to)?;
    if source.quantity != target.quantity {
        return Err(Error::invalid_value(format!(
            "Denying to convert units from {} to {}: '{}' -> '{}'.",
            source.quantity, target.quantity, from, to
        )));
    }
    Ok(source.factor / target.factor)
}

/// Replaces the unit in the last pair of parentheses of `label`.
fn replace_unit(label: &str, unit: &str) -> String {
    match UNIT.find_iter(label).last() {
        Some(m) => format!("{}({}){}", &label[..m.start()], unit, &label[m.end()..]),
        None => label.to_string(),
    }
}

/// Converts all values of a table to `to_unit`.
///
/// Time series tables and series have one unit, read from the `unit`
/// attribute. Time aggregated tables have a unit in each column label, which
/// is converted independently and rewritten in the label. In both cases the
/// `unit` attribute is set to `to_unit`.
///
/// Fails with a `MissingKey` error for unknown unit symbols and if the `unit`
/// attribute is required but missing, and with an `InvalidValue` error if
/// values would be converted between quantities, e.g. from power to energy.
pub fn scale(table: &MetricTable, to_unit: &str) -> Result<MetricTable, Error> {
    let (to_base, to_suffix) = split_suffix(to_unit);

    let result = match table.columns() {
        ColumnAxis::Series | ColumnAxis::Snapshots(_) => {
            let is_unit = table
                .unit()
                .filter(|u| !u.is_empty())
                .ok_or_else(|| Error::missing_key("Missing 'unit' in table attributes."))?;
            let (is_base, _) = split_suffix(is_unit);
            let factor = conversion_factor(is_base, to_base)?;
            table.scale_values(factor)?
        }
        ColumnAxis::Metric(labels) | ColumnAxis::Labels(labels) => {
            let mut factors = Vec::with_capacity(labels.len());
            let mut relabeled = Vec::with_capacity(labels.len());
            for label in labels {
                let unit = get_unit(label, false);
                let (base, suffix) = split_suffix(&unit);
                factors.push(conversion_factor(base, to_base)?);
                relabeled.push(replace_unit(label, &with_suffix(to_base, suffix.or(to_suffix))));
            }
            let columns = match table.columns() {
                ColumnAxis::Metric(_) => ColumnAxis::Metric(relabeled),
                _ => ColumnAxis::Labels(relabeled),
            };
            table.scale_columns(&factors)?.with_columns(columns)
        }
    };

    tracing::debug!(
        "Scaled {} rows from {:?} to '{}'.",
        table.len(),
        table.unit(),
        to_unit
    );

    Ok(result.with_unit(with_suffix(to_base, to_suffix)))
}
