//! Option sets attached to tile and shape sources.
//!
//! Both interpreters scan a [`ConfigRecord`] for a closed set of keys and keep
//! only those that are present and well typed. Nothing is defaulted here; an
//! unset field means "let the engine decide".

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::geometry::{CoordinateBounds, bounds_from_array};
use crate::record::ConfigRecord;

/// Tile addressing scheme.
///
/// # Examples
/// ```
/// use cartosource_core::TileCoordinateSystem;
///
/// assert_eq!("tms".parse::<TileCoordinateSystem>(), Ok(TileCoordinateSystem::Tms));
/// assert_eq!("xyz".parse::<TileCoordinateSystem>(), Ok(TileCoordinateSystem::Xyz));
/// assert_eq!("anything".parse::<TileCoordinateSystem>(), Ok(TileCoordinateSystem::Xyz));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileCoordinateSystem {
    /// Slippy-map ordering with the origin at the top-left.
    #[default]
    Xyz,
    /// Tile Map Service ordering with the origin at the bottom-left.
    Tms,
}

impl TileCoordinateSystem {
    /// Return the scheme as it appears in style documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xyz => "xyz",
            Self::Tms => "tms",
        }
    }
}

impl fmt::Display for TileCoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileCoordinateSystem {
    type Err = std::convert::Infallible;

    /// Only `"tms"` selects TMS; every other string falls back to XYZ.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "tms" { Self::Tms } else { Self::Xyz })
    }
}

/// Options recognised for raster, vector and raster-elevation tile sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileOptions {
    /// Area outside which no tiles are requested (`bounds`).
    pub bounds: Option<CoordinateBounds>,
    /// Lowest zoom level with tiles (`minzoom`).
    pub minimum_zoom_level: Option<f64>,
    /// Highest zoom level with tiles (`maxzoom`).
    pub maximum_zoom_level: Option<f64>,
    /// Tile edge length in pixels (`tileSize`).
    pub tile_size: Option<u32>,
    /// Tile addressing scheme (`scheme`).
    pub tile_coordinate_system: Option<TileCoordinateSystem>,
    /// Attribution text shown by the map (`attribution`).
    pub attribution: Option<String>,
}

impl TileOptions {
    /// Extract tile options from `record`.
    ///
    /// # Examples
    /// ```
    /// use cartosource_core::{ConfigRecord, TileCoordinateSystem, TileOptions};
    ///
    /// let record = ConfigRecord::new()
    ///     .with("tileSize", 257.9)
    ///     .with("scheme", "tms")
    ///     .with("maxzoom", "high");
    /// let options = TileOptions::interpret(&record);
    /// assert_eq!(options.tile_size, Some(257));
    /// assert_eq!(options.coordinate_system(), TileCoordinateSystem::Tms);
    /// assert!(options.maximum_zoom_level.is_none());
    /// ```
    #[must_use]
    pub fn interpret(record: &ConfigRecord) -> Self {
        Self {
            bounds: record.fixed_numbers::<4>("bounds").map(bounds_from_array),
            minimum_zoom_level: record.number("minzoom"),
            maximum_zoom_level: record.number("maxzoom"),
            tile_size: record.number("tileSize").map(truncate_tile_size),
            tile_coordinate_system: record
                .string("scheme")
                .map(|scheme| scheme.parse().unwrap_or_default()),
            attribution: record.string("attribution").map(str::to_owned),
        }
    }

    /// Scheme the engine will use: the configured one, else XYZ.
    #[must_use]
    pub fn coordinate_system(&self) -> TileCoordinateSystem {
        self.tile_coordinate_system.unwrap_or_default()
    }

    /// Whether no option was recognised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "tile sizes truncate toward zero and saturate at the u32 range"
)]
fn truncate_tile_size(size: f64) -> u32 {
    size as u32
}

/// Options recognised for shape (GeoJSON) sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeOptions {
    /// Highest zoom level at which tiles are generated (`maxzoom`).
    pub maximum_zoom_level: Option<f64>,
    /// Tile buffer size in screen units (`buffer`).
    pub buffer: Option<f64>,
    /// Douglas-Peucker simplification tolerance (`tolerance`).
    pub simplification_tolerance: Option<f64>,
    /// Whether point features are clustered (`cluster`).
    pub clustered: Option<bool>,
    /// Cluster radius in screen units (`clusterRadius`).
    pub cluster_radius: Option<f64>,
    /// Highest zoom level at which points are clustered (`clusterMaxZoom`).
    pub maximum_zoom_level_for_clustering: Option<f64>,
    /// Whether line distance metrics are computed (`lineMetrics`).
    pub line_distance_metrics: Option<bool>,
    /// Aggregated cluster properties, keyed by output property name
    /// (`clusterProperties`). Expressions are forwarded verbatim.
    pub cluster_properties: Option<Map<String, Value>>,
}

impl ShapeOptions {
    /// Extract shape options from `record`.
    ///
    /// # Examples
    /// ```
    /// use cartosource_core::{ConfigRecord, ShapeOptions};
    ///
    /// let record = ConfigRecord::new()
    ///     .with("cluster", true)
    ///     .with("clusterRadius", 40);
    /// let options = ShapeOptions::interpret(&record);
    /// assert_eq!(options.clustered, Some(true));
    /// assert_eq!(options.cluster_radius, Some(40.0));
    /// ```
    #[must_use]
    pub fn interpret(record: &ConfigRecord) -> Self {
        Self {
            maximum_zoom_level: record.number("maxzoom"),
            buffer: record.number("buffer"),
            simplification_tolerance: record.number("tolerance"),
            clustered: record.boolean("cluster"),
            cluster_radius: record.number("clusterRadius"),
            maximum_zoom_level_for_clustering: record.number("clusterMaxZoom"),
            line_distance_metrics: record.boolean("lineMetrics"),
            cluster_properties: record.object("clusterProperties").cloned(),
        }
    }

    /// Whether no option was recognised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
