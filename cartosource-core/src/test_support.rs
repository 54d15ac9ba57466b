//! Records and fixtures shared by unit tests and downstream test suites.

use serde_json::{Value, json};

use crate::ConfigRecord;

/// Inline tile template used by the fixtures.
pub const TILE_TEMPLATE: &str = "https://tile.example/{z}/{x}/{y}.png";

/// Remote descriptor URL used by the fixtures.
pub const DESCRIPTOR_URL: &str = "https://tile.example/tiles.json";

/// Wrap a JSON object literal, falling back to an empty record.
///
/// # Examples
/// ```
/// use cartosource_core::test_support::record;
/// use serde_json::json;
///
/// assert_eq!(record(json!({ "minzoom": 1 })).number("minzoom"), Some(1.0));
/// assert!(record(json!([1, 2])).value("0").is_none());
/// ```
#[must_use]
pub fn record(value: Value) -> ConfigRecord {
    ConfigRecord::from_value(value).unwrap_or_default()
}

/// A feature collection with one named point, a bounding box and a foreign
/// member.
#[must_use]
pub fn sample_feature_collection() -> Value {
    json!({
        "type": "FeatureCollection",
        "name": "capitals",
        "bbox": [13.4, 52.5, 13.4, 52.5],
        "features": [{
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [13.4, 52.5] },
            "properties": { "name": "Berlin" },
        }],
    })
}

/// An inline, clustered shape record holding [`sample_feature_collection`].
#[must_use]
pub fn clustered_shape_record() -> ConfigRecord {
    record(json!({
        "data": sample_feature_collection(),
        "cluster": true,
        "clusterRadius": 40,
    }))
}
