// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Parsing of location-bearing labels like bus or component names.
//!
//! [`LocationLabel::parse`] is the only place where such labels are matched
//! against the region pattern. Everything else works with the parsed
//! `{location, carrier}` pair.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::carriers::EU;

/// Two capital letters for the country code, up to three characters for the
/// region code, and an optional numeric subnet, e.g. `"AT0 1"` or `"DEA 2"`.
static REGION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9A-G]{0,3}\s*\d*").expect("valid region pattern"));

/// A label split into its location prefix and the remaining carrier name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationLabel {
    /// The location prefix, or an empty string if the label has none.
    pub location: String,
    /// Everything after the location prefix.
    pub carrier: String,
}

impl LocationLabel {
    /// Splits a label like `"AT0 1 H2 Electrolysis"` into the location
    /// `"AT0 1"` and the carrier `"H2 Electrolysis"`.
    ///
    /// Labels that mention `CH4`, and the `EU` aggregate, carry no location.
    pub fn parse(raw: &str) -> Self {
        let matched = if raw.contains("CH4") {
            None
        } else {
            REGION.find(raw)
        };

        match matched {
            Some(m) if m.as_str().trim() != EU => Self {
                location: m.as_str().trim().to_string(),
                carrier: raw[m.end()..].trim().to_string(),
            },
            _ => Self {
                location: String::new(),
                carrier: raw.trim().to_string(),
            },
        }
    }

    /// Returns `true` if the label has a location prefix.
    pub fn has_location(&self) -> bool {
        !self.location.is_empty()
    }

    /// Returns the country code of the location.
    pub fn country_code(&self) -> &str {
        country_code(&self.location)
    }
}

/// Returns the 2-letter country code of a location, i.e. its first two
/// characters. Shorter locations are returned unchanged.
pub fn country_code(location: &str) -> &str {
    location.get(..2).unwrap_or(location)
}
