//! Versioned schema of known scenario-record attributes.
//!
//! Every attribute the vectorizer may turn into a feature column is declared
//! here with its semantic type. Attributes appearing in a record's nested
//! maps that the schema does not name are ignored, so records written by
//! newer recorder builds still load without code changes.

use serde_json::Value;

/// Bumped whenever an attribute is added, removed, or retyped.
pub const SCHEMA_VERSION: u32 = 1;

/// Numeric weather attributes, in feature-column order.
pub const WEATHER_ATTRIBUTES: [&str; 6] = [
    "cloudiness",
    "precipitation",
    "precipitation_deposits",
    "wind_intensity",
    "fog_density",
    "sun_altitude_angle",
];

/// Numeric town-characteristic attributes, in feature-column order.
/// `map_name` is deliberately absent: it is a string in every record and
/// belongs to reports only.
pub const TOWN_ATTRIBUTES: [&str; 4] = [
    "traffic_lights",
    "approx_curves",
    "approx_junctions",
    "approx_roads",
];

/// Coerce a JSON value to a finite f64.
///
/// Accepts numbers and numeric strings; everything else (null, booleans,
/// arrays, objects, non-numeric text) counts as missing. String parses
/// that yield a non-finite value are rejected too, so a stray "NaN" in a
/// record behaves like an absent attribute.
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
