// License: MIT
// Copyright © 2024 esm-metrics contributors

/*!
# ESM Metrics

This is a library for turning the raw per-node statistics of a solved energy
system model into validated, unit consistent metrics, aggregated to countries
and Europe.

## The `MetricTable`

Statistics and metrics are represented as [`MetricTable`]s: tables whose rows
are identified by a composite key, e.g. `("2030", "AT0 1", "solar", "AC")` for
the row levels `year`, `location`, `carrier` and `bus_carrier`, and whose
columns are either a single time aggregated metric column, or snapshots.

Tables can be created with [`try_new`][MetricTable::try_new] and
[`series`][MetricTable::series], and every transformation returns a new table.
The rows are held in a polars `DataFrame`, with one string column per row level
and one `f64` column per value column, and transformations like
[`group_sum`][MetricTable::group_sum] run as polars expressions.

## Combining statistics

The main entry point is [`combine_statistics`], which takes the statistics of
one or more networks and:

- stacks them into a single table.
- aggregates regions to countries and to `EU` with [`aggregate_locations`].
- converts them to the requested unit with [`scale`].
- splits net trade balances into imports and exports.
- checks the result with [`verify`].

The result is guaranteed to have only known row levels, either a single metric
column with a unit or snapshot columns, and a `name` and `unit` attribute.

## Allocation of inputs

Conversion technologies with multiple outputs, like CHPs or heat pumps, are
represented by one row per bus they are connected to. The
[`calculate_input_share`] function attributes the withdrawal of such
technologies to the requested outputs, and
[`split_urban_central_heat_losses_and_consumption`] separates distribution
losses from district heating amounts.

## The `Component` and `Network` traits

This library doesn't know how the solved networks are loaded. Instead, it
uses traits to interact with them.

To classify the trade over a line or link with [`trade_mask`], the component
type must implement the [`Component`] trait, and to read configuration values
like the district heating loss fraction with [`heat_loss_factor`], the network
type must implement the [`Network`] trait. Check out the documentation for
these traits for sample implementations.
*/

mod aggregation;
pub use aggregation::{aggregate_eu, aggregate_locations};

mod allocation;
pub use allocation::{calculate_input_share, filter_for_carrier_connected_to};

pub mod carriers;

mod combine;
pub use combine::{combine_statistics, split_trade_saldo};

mod component_traits;
pub use component_traits::{Component, Network};

mod config;
pub use config::AggregationConfig;

mod costs;
pub use costs::calculate_cost_annuity;

mod dimension;
pub use dimension::Dimension;

mod error;
pub use error::{Error, ErrorKind};

mod heat;
pub use heat::{heat_loss_factor, split_urban_central_heat_losses_and_consumption};

mod location;
pub use location::{country_code, LocationLabel};

mod table;
pub use table::{iterators, Attrs, ColumnAxis, MetricTable, Row, RowKey};

mod trade;
pub use trade::{align_edge_directions, get_trade_type, trade_mask, TradeType};

mod units;
pub use units::{get_unit, scale, Quantity, UnitSymbol};

mod validation;
pub use validation::verify;
