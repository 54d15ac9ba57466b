//! Behavioural tests for building sources from style records.

use std::cell::RefCell;

use cartosource_core::test_support::{
    DESCRIPTOR_URL, TILE_TEMPLATE, clustered_shape_record, record, sample_feature_collection,
};
use cartosource_core::{ConfigRecord, Shape, Source, SourceKind, TileOrigin};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;

/// Record supplied by the `given` steps.
#[fixture]
pub fn input() -> RefCell<ConfigRecord> {
    RefCell::new(ConfigRecord::new())
}

/// Outcome of the most recent build.
#[fixture]
pub fn built() -> RefCell<Option<Source>> {
    RefCell::new(None)
}

#[given("a raster record with a descriptor URL and inline tiles")]
fn raster_with_url_and_tiles(#[from(input)] input: &RefCell<ConfigRecord>) {
    *input.borrow_mut() = record(json!({
        "url": DESCRIPTOR_URL,
        "tiles": [TILE_TEMPLATE],
        "tileSize": 512,
    }));
}

#[given("an empty record")]
fn empty_record(#[from(input)] input: &RefCell<ConfigRecord>) {
    *input.borrow_mut() = ConfigRecord::new();
}

#[given("an inline clustered shape record")]
fn clustered_shape(#[from(input)] input: &RefCell<ConfigRecord>) {
    *input.borrow_mut() = clustered_shape_record();
}

#[when("I build a raster source")]
fn build_raster(
    #[from(input)] input: &RefCell<ConfigRecord>,
    #[from(built)] built: &RefCell<Option<Source>>,
) {
    *built.borrow_mut() = Source::build("raster", &input.borrow(), SourceKind::Raster);
}

#[when("I build a geojson source")]
fn build_geojson(
    #[from(input)] input: &RefCell<ConfigRecord>,
    #[from(built)] built: &RefCell<Option<Source>>,
) {
    *built.borrow_mut() = Source::build("shapes", &input.borrow(), SourceKind::GeoJson);
}

#[when("I update the source with malformed data")]
fn update_malformed(#[from(built)] built: &RefCell<Option<Source>>) {
    let mut borrow = built.borrow_mut();
    let Some(Source::Shape(source)) = borrow.as_mut() else {
        panic!("expected a shape source");
    };
    let changed = source.update_from(&record(json!({ "data": "{\"type\":\"Point\"" })));
    assert!(!changed, "malformed data must not replace the geometry");
}

#[then("the source reads its configuration remotely")]
fn reads_remotely(#[from(built)] built: &RefCell<Option<Source>>) {
    let borrow = built.borrow();
    let Some(Source::Raster(source)) = borrow.as_ref() else {
        panic!("expected a raster source");
    };
    assert!(matches!(source.origin(), TileOrigin::Configuration(url) if url.as_str() == DESCRIPTOR_URL));
    assert!(source.options().is_empty());
}

#[then("no source is built")]
fn nothing_built(#[from(built)] built: &RefCell<Option<Source>>) {
    assert!(built.borrow().is_none(), "expected no source");
}

#[then("the source is clustered with radius 40")]
fn clustered(#[from(built)] built: &RefCell<Option<Source>>) {
    let borrow = built.borrow();
    let Some(Source::Shape(source)) = borrow.as_ref() else {
        panic!("expected a shape source");
    };
    assert_eq!(source.options().clustered, Some(true));
    assert_eq!(source.options().cluster_radius, Some(40.0));
}

#[then("the source geometry matches the input payload")]
fn geometry_matches(#[from(built)] built: &RefCell<Option<Source>>) {
    let borrow = built.borrow();
    let Some(Source::Shape(source)) = borrow.as_ref() else {
        panic!("expected a shape source");
    };
    assert_eq!(
        source.shape().map(Shape::to_value),
        Some(sample_feature_collection())
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/source_builder.feature", name = $title)]
        fn $fn_name(input: RefCell<ConfigRecord>, built: RefCell<Option<Source>>) {
            let _ = (input, built);
        }
    };
}

register_scenario!(
    url_takes_precedence,
    "A descriptor URL takes precedence over inline tiles"
);
register_scenario!(
    empty_record_is_absent,
    "A record without url or tiles yields no source"
);
register_scenario!(
    inline_clustered_geometry,
    "Inline clustered geometry keeps its options"
);
register_scenario!(
    malformed_update_is_ignored,
    "A malformed update keeps the previous geometry"
);
