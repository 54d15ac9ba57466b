//! Conversion of loosely typed style records into typed map source descriptors.
//!
//! A style layer hands over one flat JSON object per source. This crate
//! inspects that [`ConfigRecord`], decides which input shape it carries and
//! produces one of five descriptors: [`RasterTileSource`], [`VectorTileSource`],
//! [`RasterDemSource`], [`ShapeSource`] or [`ImageSource`]. Unusable input
//! yields `None`; mistyped optional keys are dropped silently and reported
//! through the `log` facade at `debug` level.
//!
//! # Examples
//!
//! ```
//! use cartosource_core::{ConfigRecord, Source, SourceKind, TileOrigin};
//!
//! let record = ConfigRecord::from_json_str(
//!     r#"{"tiles":["https://tile.example/{z}/{x}/{y}.pbf"],"maxzoom":14}"#,
//! )?;
//! let Some(Source::Vector(source)) = Source::build("roads", &record, SourceKind::Vector) else {
//!     unreachable!("inline tiles always build");
//! };
//! assert!(matches!(source.origin(), TileOrigin::Templates(_)));
//! assert_eq!(source.options().maximum_zoom_level, Some(14.0));
//! # Ok::<(), cartosource_core::RecordError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod geometry;
pub mod options;
pub mod record;
pub mod resource;
pub mod shape;
pub mod source;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use geometry::{CoordinateBounds, CoordinateQuad, bounds_from_array, quad_from_array};
pub use options::{ShapeOptions, TileCoordinateSystem, TileOptions};
pub use record::{ConfigRecord, RecordError};
pub use resource::ResourceUrl;
pub use shape::{Feature, FeatureCollection, Geometry, Position, Shape, ShapeDocument, ShapeError};
pub use source::{
    ImageSource, InputShape, RasterDemSource, RasterTileSource, ShapeOrigin, ShapeSource, Source,
    SourceKind, SourceKindError, TileOrigin, VectorTileSource,
};
