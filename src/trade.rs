// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Classification of the connection between two location-bearing labels into
//! local, domestic and foreign trade.

use std::collections::{BTreeSet, HashSet};
use std::fmt::Display;
use std::str::FromStr;

use crate::location::LocationLabel;
use crate::{Component, Error, MetricTable};

/// The scope of a connection between two buses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TradeType {
    /// Both buses are at the same location.
    Local,
    /// Different locations in the same country.
    Domestic,
    /// Different countries.
    Foreign,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Local => "local",
            TradeType::Domestic => "domestic",
            TradeType::Foreign => "foreign",
        }
    }
}

impl Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(TradeType::Local),
            "domestic" => Ok(TradeType::Domestic),
            "foreign" => Ok(TradeType::Foreign),
            _ => Err(Error::invalid_value(format!("Invalid trade scope: '{s}'."))),
        }
    }
}

/// Determines the trade type between two buses.
///
/// Returns `None` if either bus name doesn't start with a location, e.g. for
/// the `EU` buses that are not bound to a region.
pub fn get_trade_type(bus_a: &str, bus_b: &str) -> Option<TradeType> {
    let a = LocationLabel::parse(bus_a);
    let b = LocationLabel::parse(bus_b);
    if !a.has_location() || !b.has_location() {
        None
    } else if a.location == b.location {
        Some(TradeType::Local)
    } else if a.country_code() == b.country_code() {
        Some(TradeType::Domestic)
    } else {
        Some(TradeType::Foreign)
    }
}

/// Returns a mask that is `true` for every component whose trade type
/// between the buses at the two `buses` ports is one of `scopes`.
///
/// Scopes are checked up front, so that a typo fails loudly instead of
/// producing an all-`false` mask.
pub fn trade_mask<'a, C>(
    components: impl IntoIterator<Item = &'a C>,
    scopes: &[&str],
    buses: (&str, &str),
) -> Result<Vec<bool>, Error>
where
    C: Component + 'a,
{
    let mut known = BTreeSet::new();
    let mut unknown = BTreeSet::new();
    for scope in scopes {
        match scope.parse::<TradeType>() {
            Ok(trade_type) => known.insert(trade_type),
            Err(_) => unknown.insert(*scope),
        };
    }
    if !unknown.is_empty() {
        return Err(Error::invalid_value(format!(
            "Invalid trade scopes detected: {unknown:?}."
        )));
    }

    let (port_a, port_b) = buses;
    components
        .into_iter()
        .enumerate()
        .map(|(i, component)| {
            let bus_a = component.bus(port_a).ok_or_else(|| {
                Error::missing_key(format!("Component {i} has no bus '{port_a}'."))
            })?;
            let bus_b = component.bus(port_b).ok_or_else(|| {
                Error::missing_key(format!("Component {i} has no bus '{port_b}'."))
            })?;
            Ok(get_trade_type(bus_a, bus_b).is_some_and(|t| known.contains(&t)))
        })
        .collect()
}

/// Aligns the direction of edges that connect the same two nodes.
///
/// Rows are ordered by their `(lvl0, lvl1)` values. If the reversed edge
/// `(b, a)` of an edge `(a, b)` comes first in that order, the values of
/// `lvl0` and `lvl1` are exchanged, so that both edges point the same way.
/// Values are not summed, the result keeps all rows.
///
/// For example, an AC line from `FR0 0` to `IT0 0` and a DC link from `IT0 0`
/// to `FR0 0` both become edges from `FR0 0` to `IT0 0`.
pub fn align_edge_directions(
    table: &MetricTable,
    lvl0: &str,
    lvl1: &str,
) -> Result<MetricTable, Error> {
    let table = table.sort_by_levels(&[lvl0, lvl1])?;
    let edges = table
        .level_values(lvl0)?
        .zip(table.level_values(lvl1)?)
        .collect::<Vec<_>>();
    let present = edges.iter().copied().collect::<HashSet<_>>();
    let reversed = edges
        .iter()
        .map(|&(a, b)| a > b && present.contains(&(b, a)))
        .collect::<Vec<_>>();

    table.swap_levels(lvl0, lvl1, &reversed)
}
