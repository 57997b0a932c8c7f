// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Separation of district heating amounts into end use consumption and
//! distribution losses.

use crate::carriers::{GRID_LOSSES, HEAT_URBAN_CENTRAL};
use crate::{Dimension, Error, MetricTable, Network};

const CARRIER: &str = Dimension::Carrier.as_str();
const BUS_CARRIER: &str = Dimension::BusCarrier.as_str();

/// Path of the loss fraction in the network metadata.
const HEAT_LOSS_POINTER: &str = "/sector/district_heating/district_heating_loss";

fn check_heat_loss(heat_loss: f64) -> Result<f64, Error> {
    if !heat_loss.is_finite() || heat_loss < 0.0 {
        return Err(Error::invalid_value(format!(
            "Heat loss factor must be a non-negative number, found {heat_loss}."
        )));
    }
    Ok(heat_loss)
}

/// Splits `urban central heat` amounts into consumption and losses.
///
/// Heat amounts are measured at the plant, but distribution losses in the
/// heat network never reach the consumer. With the loss fraction `f`, every
/// row with the `urban central heat` bus carrier is split into
///
/// - the consumption, `value * (1 - f / (1 + f))`, and
/// - the losses, `value * f / (1 + f)`, with the carrier
///   `urban central heat losses`. Losses of different carriers at the same
///   location are summed, and stay NaN if all of them are NaN.
///
/// All other rows are returned unchanged. The result is sorted by row key.
pub fn split_urban_central_heat_losses_and_consumption(
    table: &MetricTable,
    heat_loss: f64,
) -> Result<MetricTable, Error> {
    let heat_loss = check_heat_loss(heat_loss)?;
    let loss_factor = heat_loss / (1.0 + heat_loss);

    let urban_heat = table.filter_by(BUS_CARRIER, &[HEAT_URBAN_CENTRAL])?;
    let rest = table.exclude_by(BUS_CARRIER, &[HEAT_URBAN_CENTRAL])?;
    let consumption = urban_heat.scale_values(1.0 - loss_factor)?;
    let losses = urban_heat
        .scale_values(loss_factor)?
        .relabel(CARRIER, |_| GRID_LOSSES.to_string())?
        .merge_duplicates()?;

    tracing::debug!(
        "Split {} district heating rows with a loss factor of {}.",
        urban_heat.len(),
        loss_factor
    );

    MetricTable::concat([&rest, &consumption, &losses])?.sort_index()
}

/// Returns the district heating loss fraction the networks were solved with.
///
/// Fails if a network doesn't define it, or if the networks don't agree on a
/// single value.
pub fn heat_loss_factor<'a, N>(networks: impl IntoIterator<Item = &'a N>) -> Result<f64, Error>
where
    N: Network + 'a,
{
    let mut factor: Option<f64> = None;
    for (i, network) in networks.into_iter().enumerate() {
        let value = network
            .meta()
            .pointer(HEAT_LOSS_POINTER)
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| {
                Error::missing_key(format!(
                    "Network {i} has no numeric '{HEAT_LOSS_POINTER}' in its metadata."
                ))
            })?;
        match factor {
            Some(f) if f != value => {
                return Err(Error::invalid_value(format!(
                    "Varying loss factors are not supported: {f} and {value}."
                )));
            }
            _ => factor = Some(value),
        }
    }

    let factor =
        factor.ok_or_else(|| Error::missing_key("No networks to read the heat loss factor from."))?;
    check_heat_loss(factor)
}
