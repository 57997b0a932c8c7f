// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Carrier, bus carrier and location names the pipeline treats specially.

/// The aggregated location for all European countries.
pub const EU: &str = "EU";

/// Bus carrier of district heating networks.
pub const HEAT_URBAN_CENTRAL: &str = "urban central heat";

/// Carrier of the distribution losses split off district heating amounts.
pub const GRID_LOSSES: &str = "urban central heat losses";

/// Synthetic bus carrier for the unmetered inflow of heat pumps.
pub const AMBIENT_HEAT: &str = "ambient heat";

/// Synthetic bus carrier for the unmetered inflow of other technologies.
pub const LATENT_HEAT: &str = "latent heat";

pub const NET_IMPORT: &str = "Net Import";
pub const NET_EXPORT: &str = "Net Export";
pub const IMPORT_FOREIGN: &str = "Import Foreign";
pub const EXPORT_FOREIGN: &str = "Export Foreign";
pub const IMPORT_DOMESTIC: &str = "Import Domestic";
pub const EXPORT_DOMESTIC: &str = "Export Domestic";
pub const DOMESTIC_IMPORT: &str = "domestic import";
pub const DOMESTIC_EXPORT: &str = "domestic export";

/// Substring marking signed net trade balance carriers.
pub const SALDO: &str = "saldo";

/// Carriers that are dropped when regions are rolled up to countries.
///
/// Trade between regions of the same country nets to zero on country level.
pub const DOMESTIC_TRADE: [&str; 4] = [
    DOMESTIC_EXPORT,
    DOMESTIC_IMPORT,
    IMPORT_DOMESTIC,
    EXPORT_DOMESTIC,
];

/// Carriers that are dropped from the `EU` aggregate.
///
/// Imports and exports between European countries even out. Imports from
/// outside Europe use other carrier names.
pub const EU_EXCLUDED: [&str; 8] = [
    NET_IMPORT,
    NET_EXPORT,
    IMPORT_FOREIGN,
    EXPORT_FOREIGN,
    IMPORT_DOMESTIC,
    EXPORT_DOMESTIC,
    DOMESTIC_IMPORT,
    DOMESTIC_EXPORT,
];

/// Returns the display name for a country or region code.
pub fn nice_location_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "EU" => "Europe",
        "AL" => "Albania",
        "AT" => "Austria",
        "BA" => "Bosnia and Herzegovina",
        "BE" => "Belgium",
        "BG" => "Bulgaria",
        "CH" => "Switzerland",
        "CZ" => "Czech Republic",
        "DE" => "Germany",
        "DK" => "Denmark",
        "EE" => "Estonia",
        "ES" => "Spain",
        "FI" => "Finland",
        "FR" => "France",
        "GB" => "Great Britain",
        "GR" => "Greece",
        "HR" => "Croatia",
        "HU" => "Hungary",
        "IE" => "Ireland",
        "IT" => "Italy",
        "LT" => "Lithuania",
        "LU" => "Luxembourg",
        "LV" => "Latvia",
        "ME" => "Montenegro",
        "MK" => "North Macedonia",
        "NL" => "Netherlands",
        "NO" => "Norway",
        "PL" => "Poland",
        "PT" => "Portugal",
        "RO" => "Romania",
        "RS" => "Serbia",
        "SE" => "Sweden",
        "SI" => "Slovenia",
        "SK" => "Slovakia",
        "XK" => "Kosovo",
        // Austrian NUTS2
        "AT11" => "Burgenland (AT)",
        "AT12" => "Lower Austria (AT)",
        "AT13" => "Vienna (AT)",
        "AT21" => "Carinthia (AT)",
        "AT22" => "Styria (AT)",
        "AT31" => "Upper Austria (AT)",
        "AT32" => "Salzburg (AT)",
        "AT33" => "Tyrol (AT)",
        "AT333" => "East Tyrol (AT)",
        "AT34" => "Vorarlberg (AT)",
        // German NUTS1
        "DE1" => "Baden-Württemberg",
        "DE2" => "Bavaria",
        "DE3" => "Berlin",
        "DE4" => "Brandenburg",
        "DE5" => "Bremen",
        "DE6" => "Hamburg",
        "DE7" => "Hesse",
        "DE8" => "Mecklenburg-Western Pomerania",
        "DE9" => "Lower Saxony",
        "DEA" => "North Rhine-Westphalia",
        "DEB" => "Rhineland-Palatinate",
        "DEC" => "Saarland",
        "DED" => "Saxony",
        "DEE" => "Saxony-Anhalt",
        "DEF" => "Schleswig-Holstein",
        "DEG" => "Thuringia",
        _ => return None,
    };
    Some(name)
}
