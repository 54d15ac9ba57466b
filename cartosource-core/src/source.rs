//! Typed source descriptors and the builders that produce them.
//!
//! Every builder resolves the record's [`InputShape`] once and matches on it.
//! The precedence is fixed: a remote-descriptor URL wins over inline content,
//! and a record matching neither yields `None`. Builders never return a
//! partially populated descriptor.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::geometry::{CoordinateQuad, quad_from_array};
use crate::options::{ShapeOptions, TileOptions};
use crate::record::ConfigRecord;
use crate::resource::ResourceUrl;
use crate::shape::Shape;

/// The kind of input a record carries, resolved once per build.
#[derive(Debug, Clone, PartialEq)]
pub enum InputShape<'a> {
    /// A URL pointing at a document that describes the source.
    RemoteUrl(ResourceUrl),
    /// Tile URL templates supplied inline.
    InlineTiles(Vec<String>),
    /// Geometry supplied inline, either as JSON or as geometry text.
    InlineGeometry(&'a Value),
    /// Nothing the builder knows how to use.
    Unrecognized,
}

impl<'a> InputShape<'a> {
    /// Classify a tile source record: `url`, then `tiles`.
    #[must_use]
    pub fn of_tiles(record: &'a ConfigRecord) -> Self {
        if let Some(url) = record.string("url").and_then(ResourceUrl::parse) {
            return Self::RemoteUrl(url);
        }
        match record.string_array("tiles") {
            Some(tiles) => Self::InlineTiles(tiles),
            None => Self::Unrecognized,
        }
    }

    /// Classify a shape source record: `data` as a URL, then `data` inline.
    #[must_use]
    pub fn of_shape(record: &'a ConfigRecord) -> Self {
        let Some(data) = record.value("data") else {
            return Self::Unrecognized;
        };
        match data.as_str().and_then(ResourceUrl::parse) {
            Some(url) => Self::RemoteUrl(url),
            None => Self::InlineGeometry(data),
        }
    }
}

/// Where a tile source reads its tiles from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileOrigin {
    /// A TileJSON-style document describing the tile set.
    Configuration(ResourceUrl),
    /// Tile URL templates such as `https://tile.example/{z}/{x}/{y}.png`.
    Templates(Vec<String>),
}

/// Resolve the origin and options shared by every tile source family.
fn tile_parts(
    identifier: &str,
    family: &str,
    record: &ConfigRecord,
) -> Option<(TileOrigin, TileOptions)> {
    match InputShape::of_tiles(record) {
        InputShape::RemoteUrl(url) => {
            log::debug!("{family} source {identifier:?} reads its configuration from {url}");
            Some((TileOrigin::Configuration(url), TileOptions::default()))
        }
        InputShape::InlineTiles(tiles) => {
            log::debug!(
                "{family} source {identifier:?} uses {} inline tile template(s)",
                tiles.len()
            );
            Some((TileOrigin::Templates(tiles), TileOptions::interpret(record)))
        }
        // `of_tiles` never reports inline geometry.
        InputShape::InlineGeometry(_) | InputShape::Unrecognized => {
            log::debug!("{family} source {identifier:?} has neither `url` nor `tiles`");
            None
        }
    }
}

macro_rules! tile_source {
    ($(#[$meta:meta])* $name:ident, $family:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            identifier: String,
            origin: TileOrigin,
            options: TileOptions,
        }

        impl $name {
            /// Build the source from `record`, or `None` if it has neither a
            /// valid `url` nor a `tiles` array.
            #[must_use]
            pub fn build(identifier: &str, record: &ConfigRecord) -> Option<Self> {
                let (origin, options) = tile_parts(identifier, $family, record)?;
                Some(Self {
                    identifier: identifier.to_owned(),
                    origin,
                    options,
                })
            }

            /// Identifier the source is registered under.
            #[must_use]
            pub fn identifier(&self) -> &str {
                &self.identifier
            }

            /// Where tiles come from.
            #[must_use]
            pub const fn origin(&self) -> &TileOrigin {
                &self.origin
            }

            /// Options interpreted from the record. Empty for remote origins.
            #[must_use]
            pub const fn options(&self) -> &TileOptions {
                &self.options
            }
        }
    };
}

tile_source!(
    /// Raster image tiles.
    ///
    /// # Examples
    /// ```
    /// use cartosource_core::{ConfigRecord, RasterTileSource, TileOrigin};
    ///
    /// let record = ConfigRecord::new()
    ///     .with("tiles", vec!["https://tile.example/{z}/{x}/{y}.png"])
    ///     .with("tileSize", 256);
    /// let source = RasterTileSource::build("osm", &record).expect("tiles are present");
    /// assert!(matches!(source.origin(), TileOrigin::Templates(_)));
    /// assert_eq!(source.options().tile_size, Some(256));
    /// ```
    RasterTileSource,
    "raster"
);

tile_source!(
    /// Vector tiles.
    VectorTileSource,
    "vector"
);

tile_source!(
    /// Raster elevation (DEM) tiles.
    RasterDemSource,
    "raster-dem"
);

/// Where a shape source reads its geometry from.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeOrigin {
    /// A geometry document fetched from a URL.
    Url(ResourceUrl),
    /// Geometry held in memory.
    Inline(Shape),
}

/// Vector geometry supplied inline or fetched as a document.
///
/// # Examples
/// ```
/// use cartosource_core::{ConfigRecord, ShapeSource};
/// use serde_json::json;
///
/// let record = ConfigRecord::new()
///     .with("data", json!({ "type": "Point", "coordinates": [0.0, 0.0] }))
///     .with("cluster", true);
/// let source = ShapeSource::build("points", &record).expect("inline point");
/// assert!(source.shape().is_some());
/// assert_eq!(source.options().clustered, Some(true));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeSource {
    identifier: String,
    origin: ShapeOrigin,
    options: ShapeOptions,
}

impl ShapeSource {
    /// Build the source from `record`'s `data` key.
    ///
    /// A `data` string that reads as an absolute URL or a relative reference
    /// selects a remote document. Any
    /// other `data` value is read as inline geometry: JSON objects directly,
    /// other strings as geometry text. Malformed geometry yields `None`.
    #[must_use]
    pub fn build(identifier: &str, record: &ConfigRecord) -> Option<Self> {
        let options = ShapeOptions::interpret(record);
        let origin = match InputShape::of_shape(record) {
            InputShape::RemoteUrl(url) => {
                log::debug!("geojson source {identifier:?} fetches its data from {url}");
                ShapeOrigin::Url(url)
            }
            InputShape::InlineGeometry(data) => match inline_shape(data) {
                Some(shape) => ShapeOrigin::Inline(shape),
                None => {
                    log::debug!("geojson source {identifier:?} has unreadable inline data");
                    return None;
                }
            },
            InputShape::InlineTiles(_) | InputShape::Unrecognized => {
                log::debug!("geojson source {identifier:?} has no `data`");
                return None;
            }
        };
        Some(Self {
            identifier: identifier.to_owned(),
            origin,
            options,
        })
    }

    /// Identifier the source is registered under.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Where geometry comes from.
    #[must_use]
    pub const fn origin(&self) -> &ShapeOrigin {
        &self.origin
    }

    /// Options interpreted from the record.
    #[must_use]
    pub const fn options(&self) -> &ShapeOptions {
        &self.options
    }

    /// Inline geometry, if the source holds any.
    #[must_use]
    pub const fn shape(&self) -> Option<&Shape> {
        match &self.origin {
            ShapeOrigin::Inline(shape) => Some(shape),
            ShapeOrigin::Url(_) => None,
        }
    }

    /// Remote document URL, if the source fetches its data.
    #[must_use]
    pub const fn url(&self) -> Option<&ResourceUrl> {
        match &self.origin {
            ShapeOrigin::Url(url) => Some(url),
            ShapeOrigin::Inline(_) => None,
        }
    }

    /// Replace the source's geometry with `shape`.
    pub fn set_shape(&mut self, shape: Shape) {
        self.origin = ShapeOrigin::Inline(shape);
    }

    /// Replace the geometry with `record`'s `data` string, read as geometry
    /// text.
    ///
    /// Returns `true` when the geometry was replaced. A missing, non-string
    /// or malformed `data` leaves the source untouched.
    ///
    /// # Examples
    /// ```
    /// use cartosource_core::{ConfigRecord, ShapeSource};
    ///
    /// let initial = ConfigRecord::new()
    ///     .with("data", r#"{"type":"Point","coordinates":[0,0]}"#);
    /// let mut source = ShapeSource::build("marker", &initial).expect("inline point");
    ///
    /// let moved = ConfigRecord::new()
    ///     .with("data", r#"{"type":"Point","coordinates":[5,5]}"#);
    /// assert!(source.update_from(&moved));
    /// assert!(!source.update_from(&ConfigRecord::new().with("data", "{broken")));
    /// ```
    pub fn update_from(&mut self, record: &ConfigRecord) -> bool {
        let Some(text) = record.string("data") else {
            return false;
        };
        match text.parse::<Shape>() {
            Ok(shape) => {
                self.set_shape(shape);
                true
            }
            Err(err) => {
                log::debug!(
                    "keeping previous geometry of {:?}: {err}",
                    self.identifier
                );
                false
            }
        }
    }
}

fn inline_shape(data: &Value) -> Option<Shape> {
    let parsed = match data {
        Value::String(text) => text.parse::<Shape>(),
        other => Shape::from_value(other),
    };
    parsed
        .map_err(|err| log::debug!("inline geometry rejected: {err}"))
        .ok()
}

/// A single image warped onto four geographic corners.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    identifier: String,
    url: ResourceUrl,
    coordinates: CoordinateQuad,
}

impl ImageSource {
    /// Build the source from `url` and `coordinates`; both are required.
    ///
    /// `coordinates` must hold exactly four `[longitude, latitude]` pairs
    /// ordered top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub fn build(identifier: &str, record: &ConfigRecord) -> Option<Self> {
        let url = record.string("url").and_then(ResourceUrl::parse);
        let corners = record.coordinate_pairs::<4>("coordinates");
        let (Some(url), Some(corners)) = (url, corners) else {
            log::debug!("image source {identifier:?} needs both `url` and four `coordinates`");
            return None;
        };
        Some(Self {
            identifier: identifier.to_owned(),
            url,
            coordinates: quad_from_array(corners),
        })
    }

    /// Identifier the source is registered under.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Image location.
    #[must_use]
    pub const fn url(&self) -> &ResourceUrl {
        &self.url
    }

    /// Corners the image is stretched onto.
    #[must_use]
    pub const fn coordinates(&self) -> &CoordinateQuad {
        &self.coordinates
    }
}

/// Error returned when a source type string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown source type {0:?}")]
pub struct SourceKindError(pub String);

/// The source variant a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Raster tiles.
    Raster,
    /// Vector tiles.
    Vector,
    /// Raster elevation tiles.
    RasterDem,
    /// GeoJSON geometry.
    GeoJson,
    /// A single georeferenced image.
    Image,
}

impl SourceKind {
    /// Return the kind as it appears in style documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Raster => "raster",
            Self::Vector => "vector",
            Self::RasterDem => "raster-dem",
            Self::GeoJson => "geojson",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = SourceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raster" => Ok(Self::Raster),
            "vector" => Ok(Self::Vector),
            "raster-dem" => Ok(Self::RasterDem),
            "geojson" => Ok(Self::GeoJson),
            "image" => Ok(Self::Image),
            _ => Err(SourceKindError(s.to_owned())),
        }
    }
}

/// Any source descriptor the converter can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Raster tiles.
    Raster(RasterTileSource),
    /// Vector tiles.
    Vector(VectorTileSource),
    /// Raster elevation tiles.
    RasterDem(RasterDemSource),
    /// GeoJSON geometry.
    Shape(ShapeSource),
    /// A single georeferenced image.
    Image(ImageSource),
}

impl Source {
    /// Build the descriptor selected by `kind`.
    ///
    /// # Examples
    /// ```
    /// use cartosource_core::{ConfigRecord, Source, SourceKind};
    ///
    /// let record = ConfigRecord::new().with("url", "mapbox://mapbox.satellite");
    /// let source = Source::build("satellite", &record, SourceKind::Raster);
    /// assert!(matches!(source, Some(Source::Raster(_))));
    /// assert!(Source::build("satellite", &ConfigRecord::new(), SourceKind::Raster).is_none());
    /// ```
    #[must_use]
    pub fn build(identifier: &str, record: &ConfigRecord, kind: SourceKind) -> Option<Self> {
        match kind {
            SourceKind::Raster => RasterTileSource::build(identifier, record).map(Self::Raster),
            SourceKind::Vector => VectorTileSource::build(identifier, record).map(Self::Vector),
            SourceKind::RasterDem => {
                RasterDemSource::build(identifier, record).map(Self::RasterDem)
            }
            SourceKind::GeoJson => ShapeSource::build(identifier, record).map(Self::Shape),
            SourceKind::Image => ImageSource::build(identifier, record).map(Self::Image),
        }
    }

    /// Build the descriptor named by the record's own `type` key.
    #[must_use]
    pub fn from_record(identifier: &str, record: &ConfigRecord) -> Option<Self> {
        let kind = match record.string("type")?.parse::<SourceKind>() {
            Ok(kind) => kind,
            Err(err) => {
                log::debug!("skipping source {identifier:?}: {err}");
                return None;
            }
        };
        Self::build(identifier, record, kind)
    }

    /// Identifier the source is registered under.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match self {
            Self::Raster(source) => source.identifier(),
            Self::Vector(source) => source.identifier(),
            Self::RasterDem(source) => source.identifier(),
            Self::Shape(source) => source.identifier(),
            Self::Image(source) => source.identifier(),
        }
    }

    /// Variant of this descriptor.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Raster(_) => SourceKind::Raster,
            Self::Vector(_) => SourceKind::Vector,
            Self::RasterDem(_) => SourceKind::RasterDem,
            Self::Shape(_) => SourceKind::GeoJson,
            Self::Image(_) => SourceKind::Image,
        }
    }
}
