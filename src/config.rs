// License: MIT
// Copyright © 2024 esm-metrics contributors

//! This module contains the configuration options for location aggregation.

/// Configuration options for rolling up locations to countries and `EU`.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregationConfig {
    /// Country codes whose sub-country regions are kept in the output next to
    /// the aggregated country, e.g. `"AT"` keeps `"AT0 1"`, `"AT0 2"`, ...
    pub keep_regions: Vec<String>,

    /// Whether to replace location codes with display names, e.g. `"AT"`
    /// becomes `"Austria"` and `"EU"` becomes `"Europe"`.
    pub nice_names: bool,
}

impl AggregationConfig {
    /// Creates a config that keeps the regions of the given countries.
    pub fn new<S: Into<String>>(keep_regions: impl IntoIterator<Item = S>, nice_names: bool) -> Self {
        Self {
            keep_regions: keep_regions.into_iter().map(Into::into).collect(),
            nice_names,
        }
    }

    /// Returns `true` if `location` is a sub-country region of one of the
    /// countries in `keep_regions`.
    pub(crate) fn keeps(&self, location: &str) -> bool {
        location.len() > 2
            && self
                .keep_regions
                .iter()
                .any(|prefix| !prefix.is_empty() && location.starts_with(prefix.as_str()))
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self::new(["AT", "GB", "ES", "FR", "DE", "IT"], true)
    }
}
