//! Facade crate for the cartosource style-to-source converter.
//!
//! This crate re-exports the record, option, geometry and source types from
//! `cartosource-core` so callers depend on a single crate.

#![forbid(unsafe_code)]

pub use cartosource_core::{
    ConfigRecord, CoordinateBounds, CoordinateQuad, Feature, FeatureCollection, Geometry,
    ImageSource, InputShape, Position, RasterDemSource, RasterTileSource, RecordError,
    ResourceUrl, Shape, ShapeDocument, ShapeError, ShapeOptions, ShapeOrigin, ShapeSource, Source,
    SourceKind, SourceKindError, TileCoordinateSystem, TileOptions, TileOrigin, VectorTileSource,
    bounds_from_array, quad_from_array,
};

#[cfg(feature = "test-support")]
pub use cartosource_core::test_support;
