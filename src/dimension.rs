// License: MIT
// Copyright © 2024 esm-metrics contributors

//! This module defines the `Dimension` enum, which represents the row levels
//! that are allowed in a validated metric, and the names of the column axis
//! kinds.

use std::fmt::Display;
use std::str::FromStr;

use crate::Error;

/// Column axis name of metrics with a single time aggregated column.
pub const METRIC: &str = "metric";

/// Column axis name of metrics with one column per snapshot.
pub const SNAPSHOTS: &str = "snapshots";

/// Represents a row level of a validated metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Year,
    Location,
    Carrier,
    BusCarrier,
}

impl Dimension {
    /// All row levels a validated metric may carry.
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::Location,
        Dimension::Carrier,
        Dimension::BusCarrier,
    ];

    /// Returns the level name used in metric tables.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Dimension::Year => "year",
            Dimension::Location => "location",
            Dimension::Carrier => "carrier",
            Dimension::BusCarrier => "bus_carrier",
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::invalid_value(format!("Unknown row dimension: '{s}'.")))
    }
}

impl AsRef<str> for Dimension {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
