//! Property-based tests for the source builders.
//!
//! # Invariants tested
//!
//! - **No origin, no source:** tile builders return `None` without `url` or
//!   `tiles`, whatever else the record holds.
//! - **URL precedence:** a valid `url` always produces a remote origin.
//! - **Truncation:** `tileSize` keeps the integral part of the number.
//! - **Stable options:** rebuilding from the same record yields equal options.

use cartosource_core::test_support::TILE_TEMPLATE;
use cartosource_core::{
    ConfigRecord, RasterDemSource, RasterTileSource, ShapeSource, TileOrigin, TileOptions,
    VectorTileSource,
};
use proptest::prelude::*;
use serde_json::{Map, Value, json};

/// Keys that never select a tile origin.
const OPTION_KEYS: [&str; 7] = [
    "bounds",
    "minzoom",
    "maxzoom",
    "tileSize",
    "scheme",
    "attribution",
    "data",
];

fn any_json() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1.0e6..1.0e6f64).prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(Value::from),
        prop::collection::vec(-180.0..180.0f64, 0..6).prop_map(|v| json!(v)),
    ]
}

fn option_record() -> impl Strategy<Value = ConfigRecord> {
    prop::collection::vec((prop::sample::select(OPTION_KEYS.to_vec()), any_json()), 0..6).prop_map(
        |entries| {
            let map: Map<String, Value> = entries
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect();
            ConfigRecord::from(map)
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn tile_builders_need_an_origin(config in option_record()) {
        prop_assert!(RasterTileSource::build("t", &config).is_none());
        prop_assert!(VectorTileSource::build("t", &config).is_none());
        prop_assert!(RasterDemSource::build("t", &config).is_none());
    }

    #[test]
    fn valid_url_always_wins(config in option_record(), host in "[a-z]{1,12}") {
        let with_url = config
            .with("url", format!("https://{host}.example/tiles.json"))
            .with("tiles", vec![TILE_TEMPLATE]);
        let source = VectorTileSource::build("v", &with_url);
        prop_assert!(matches!(
            source.as_ref().map(VectorTileSource::origin),
            Some(TileOrigin::Configuration(_))
        ));
    }

    #[test]
    fn tile_size_truncates(size in 0.0..100_000.0f64) {
        let options = TileOptions::interpret(&ConfigRecord::new().with("tileSize", size));
        let expected = u32::try_from(size.trunc() as u64).ok();
        prop_assert_eq!(options.tile_size, expected);
    }

    #[test]
    fn rebuilding_yields_equal_options(config in option_record()) {
        let with_tiles = config.with("tiles", vec![TILE_TEMPLATE]);
        let first = RasterTileSource::build("r", &with_tiles);
        let second = RasterTileSource::build("r", &with_tiles);
        prop_assert_eq!(
            first.as_ref().map(RasterTileSource::options),
            second.as_ref().map(RasterTileSource::options)
        );
        prop_assert_eq!(
            first.map(|source| source.options().clone()),
            Some(TileOptions::interpret(&with_tiles))
        );
    }

    #[test]
    fn shape_options_are_stable(radius in 0.0..500.0f64, cluster in any::<bool>()) {
        let config = ConfigRecord::new()
            .with("data", json!({ "type": "Point", "coordinates": [0.0, 0.0] }))
            .with("cluster", cluster)
            .with("clusterRadius", radius);
        let first = ShapeSource::build("s", &config);
        let second = ShapeSource::build("s", &config);
        prop_assert_eq!(
            first.as_ref().map(ShapeSource::options),
            second.as_ref().map(ShapeSource::options)
        );
        prop_assert_eq!(first.and_then(|source| source.options().clustered), Some(cluster));
    }
}
