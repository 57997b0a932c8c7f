// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Aggregation of regions to countries and to the `EU` total.

use crate::carriers::{nice_location_name, DOMESTIC_TRADE, EU, EU_EXCLUDED};
use crate::location::country_code;
use crate::{AggregationConfig, Dimension, Error, MetricTable};

const LOCATION: &str = Dimension::Location.as_str();
const CARRIER: &str = Dimension::Carrier.as_str();

/// Sums all locations into a single `EU` location.
///
/// Rows that are already labeled `EU`, and rows without a location, are not
/// included. Trade carriers are dropped, because trade between European
/// countries nets out on EU level.
pub fn aggregate_eu(table: &MetricTable) -> Result<MetricTable, Error> {
    let europe = table
        .exclude_by(LOCATION, &[EU, ""])?
        .rename_all(LOCATION, EU)?;

    if europe.has_level(CARRIER) {
        europe.exclude_by(CARRIER, &EU_EXCLUDED)
    } else {
        Ok(europe)
    }
}

/// Aggregates regions to countries, and adds the `EU` total.
///
/// Every location is renamed to its country code and duplicate rows are
/// summed. Domestic trade carriers are dropped from the countries, since
/// imports and exports between regions of the same country net to zero.
///
/// Regions of the countries in [`AggregationConfig::keep_regions`] are kept in
/// the result as they are. The result is sorted by row key, and locations are
/// replaced by their display names if [`AggregationConfig::nice_names`] is
/// set.
pub fn aggregate_locations(
    table: &MetricTable,
    config: &AggregationConfig,
) -> Result<MetricTable, Error> {
    if table
        .level_values(LOCATION)?
        .any(|location| country_code(location) == EU)
    {
        tracing::warn!(
            "Values for '{}' found in the input table. This can lead to value doubling \
             during location aggregation.",
            EU
        );
    }

    let mut countries = table.rename_with(LOCATION, |l| country_code(l).to_string())?;
    if countries.has_level(CARRIER) {
        countries = countries.exclude_by(CARRIER, &DOMESTIC_TRADE)?;
    }
    let regions = table.filter_level(LOCATION, |location| config.keeps(location))?;
    let europe = aggregate_eu(table)?;

    tracing::debug!(
        "Aggregated {} rows to {} country, {} region and {} EU rows.",
        table.len(),
        countries.len(),
        regions.len(),
        europe.len()
    );

    let result = MetricTable::concat([&countries, &regions, &europe])?.sort_index()?;
    if !config.nice_names {
        return Ok(result);
    }

    result.relabel(LOCATION, |location| {
        nice_location_name(location).map_or_else(|| location.to_string(), str::to_string)
    })
}
