//! Inline shape documents in GeoJSON text form.
//!
//! Only the structure is checked: the `type` member must name a known
//! document kind, members must have the right nesting and every position must
//! carry at least a longitude and a latitude. Winding order, ring closure and
//! coordinate ranges are left to the rendering engine.

use std::str::FromStr;

use geo::Coord;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single position: `[longitude, latitude, ...]`.
///
/// Extra elements such as altitude are preserved but ignored by
/// [`Geometry::to_geo`].
pub type Position = Vec<f64>;

/// Errors raised while reading a [`Shape`].
#[derive(Debug, Error)]
pub enum ShapeError {
    /// The geometry text was not valid JSON.
    #[error("geometry text is not valid JSON")]
    Json {
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// The document was not an object with a string `type` member.
    #[error("geometry document has no string \"type\" member")]
    MissingType,
    /// The `type` member named an unsupported kind.
    #[error("unsupported geometry document type {found:?}")]
    UnknownType {
        /// Value of the `type` member.
        found: String,
    },
    /// Members did not match the declared document type.
    #[error("malformed {kind} document")]
    Malformed {
        /// Declared document type.
        kind: &'static str,
        /// Source error from `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A position had fewer than two elements.
    #[error("position must hold at least two numbers, found {len}")]
    ShortPosition {
        /// Number of elements found.
        len: usize,
    },
}

/// A geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point {
        /// The position.
        coordinates: Position,
    },
    /// Unconnected positions.
    MultiPoint {
        /// The positions.
        coordinates: Vec<Position>,
    },
    /// A connected line.
    LineString {
        /// Line vertices.
        coordinates: Vec<Position>,
    },
    /// Several lines.
    MultiLineString {
        /// Vertices of each line.
        coordinates: Vec<Vec<Position>>,
    },
    /// An exterior ring followed by optional holes.
    Polygon {
        /// Rings, exterior first.
        coordinates: Vec<Vec<Position>>,
    },
    /// Several polygons.
    MultiPolygon {
        /// Rings of each polygon.
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    /// Heterogeneous geometries.
    GeometryCollection {
        /// Member geometries.
        geometries: Vec<Geometry>,
    },
}

/// A geometry with attached properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    /// Optional feature identifier (string or number).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Feature geometry; `null` for unlocated features.
    #[serde(default)]
    pub geometry: Option<Geometry>,
    /// Free-form properties.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    /// Bounding box, `[west, south, east, north]` with optional altitudes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

/// An ordered list of features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    /// Member features.
    pub features: Vec<Feature>,
    /// Bounding box of every member feature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

/// The structure of a [`Shape`], as far as it is checked.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeDocument {
    /// A bare geometry.
    Geometry(Geometry),
    /// A single feature.
    Feature(Feature),
    /// A collection of features.
    FeatureCollection(FeatureCollection),
}

impl ShapeDocument {
    /// Geometries contained in the document, in order.
    #[must_use]
    pub fn geometries(&self) -> Vec<&Geometry> {
        match self {
            Self::Geometry(geometry) => vec![geometry],
            Self::Feature(feature) => feature.geometry.iter().collect(),
            Self::FeatureCollection(collection) => collection
                .features
                .iter()
                .filter_map(|feature| feature.geometry.as_ref())
                .collect(),
        }
    }

    fn read(value: &Value) -> Result<Self, ShapeError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ShapeError::MissingType)?;
        let document = match kind {
            "Feature" => Self::Feature(decode("Feature", value)?),
            "FeatureCollection" => Self::FeatureCollection(decode("FeatureCollection", value)?),
            other => match GEOMETRY_TYPES.iter().find(|known| **known == other) {
                Some(&known) => Self::Geometry(decode(known, value)?),
                None => {
                    return Err(ShapeError::UnknownType {
                        found: other.to_owned(),
                    });
                }
            },
        };
        document
            .geometries()
            .into_iter()
            .try_for_each(Geometry::check_positions)?;
        Ok(document)
    }
}

/// Any top-level geometry document accepted by a shape source.
///
/// The document is checked once on construction and then kept exactly as
/// written, so members the checked structure does not model (`bbox`,
/// foreign members, integer coordinates) reach the engine unchanged.
///
/// # Examples
/// ```
/// use cartosource_core::{Shape, ShapeDocument};
///
/// let shape: Shape = r#"{"type":"Point","coordinates":[13.4,52.5]}"#.parse()?;
/// assert!(matches!(shape.document(), ShapeDocument::Geometry(_)));
/// assert!("{\"type\":\"Circle\"}".parse::<Shape>().is_err());
/// # Ok::<(), cartosource_core::ShapeError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    document: ShapeDocument,
    value: Value,
}

const GEOMETRY_TYPES: [&str; 7] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
];

impl Shape {
    /// Read a shape from UTF-8 geometry text.
    ///
    /// # Errors
    /// Returns [`ShapeError::Json`] for malformed JSON and the structural
    /// variants described on [`Shape::from_value`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ShapeError> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|source| ShapeError::Json { source })?;
        let document = ShapeDocument::read(&value)?;
        Ok(Self { document, value })
    }

    /// Interpret an already-parsed JSON value as a shape.
    ///
    /// # Errors
    /// Returns [`ShapeError::MissingType`], [`ShapeError::UnknownType`],
    /// [`ShapeError::Malformed`] or [`ShapeError::ShortPosition`] when the
    /// value does not describe a geometry document.
    pub fn from_value(value: &Value) -> Result<Self, ShapeError> {
        Ok(Self {
            document: ShapeDocument::read(value)?,
            value: value.clone(),
        })
    }

    /// The checked structure of the document.
    #[must_use]
    pub const fn document(&self) -> &ShapeDocument {
        &self.document
    }

    /// The document as it was supplied.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.value
    }

    /// A copy of the document as it was supplied.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.value.clone()
    }

    /// Consume the shape, returning the document as it was supplied.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Geometries contained in the document, in order.
    #[must_use]
    pub fn geometries(&self) -> Vec<&Geometry> {
        self.document.geometries()
    }
}

impl FromStr for Shape {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

fn decode<T>(kind: &'static str, value: &Value) -> Result<T, ShapeError>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(value).map_err(|source| ShapeError::Malformed { kind, source })
}

impl Geometry {
    fn check_positions(&self) -> Result<(), ShapeError> {
        fn check(position: &Position) -> Result<(), ShapeError> {
            if position.len() < 2 {
                return Err(ShapeError::ShortPosition {
                    len: position.len(),
                });
            }
            Ok(())
        }

        match self {
            Self::Point { coordinates } => check(coordinates),
            Self::MultiPoint { coordinates } | Self::LineString { coordinates } => {
                coordinates.iter().try_for_each(check)
            }
            Self::MultiLineString { coordinates } | Self::Polygon { coordinates } => {
                coordinates.iter().flatten().try_for_each(check)
            }
            Self::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().try_for_each(check)
            }
            Self::GeometryCollection { geometries } => {
                geometries.iter().try_for_each(Self::check_positions)
            }
        }
    }

    /// Convert to a two-dimensional [`geo::Geometry`].
    ///
    /// Returns `None` if a position holds fewer than two numbers, which can
    /// only happen for geometries assembled by hand.
    ///
    /// # Examples
    /// ```
    /// use cartosource_core::Geometry;
    ///
    /// let line = Geometry::LineString {
    ///     coordinates: vec![vec![0.0, 0.0], vec![1.0, 1.0, 30.0]],
    /// };
    /// let converted = line.to_geo().expect("positions are complete");
    /// assert!(matches!(converted, geo::Geometry::LineString(_)));
    /// ```
    #[must_use]
    pub fn to_geo(&self) -> Option<geo::Geometry<f64>> {
        let converted = match self {
            Self::Point { coordinates } => geo::Geometry::Point(coord(coordinates)?.into()),
            Self::MultiPoint { coordinates } => geo::Geometry::MultiPoint(geo::MultiPoint::new(
                coordinates
                    .iter()
                    .map(|position| coord(position).map(geo::Point::from))
                    .collect::<Option<_>>()?,
            )),
            Self::LineString { coordinates } => geo::Geometry::LineString(line(coordinates)?),
            Self::MultiLineString { coordinates } => {
                geo::Geometry::MultiLineString(geo::MultiLineString::new(
                    coordinates.iter().map(|l| line(l)).collect::<Option<_>>()?,
                ))
            }
            Self::Polygon { coordinates } => geo::Geometry::Polygon(polygon(coordinates)?),
            Self::MultiPolygon { coordinates } => geo::Geometry::MultiPolygon(
                geo::MultiPolygon::new(
                    coordinates
                        .iter()
                        .map(|rings| polygon(rings))
                        .collect::<Option<_>>()?,
                ),
            ),
            Self::GeometryCollection { geometries } => {
                geo::Geometry::GeometryCollection(geo::GeometryCollection(
                    geometries
                        .iter()
                        .map(Self::to_geo)
                        .collect::<Option<_>>()?,
                ))
            }
        };
        Some(converted)
    }
}

fn coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

fn line(positions: &[Position]) -> Option<geo::LineString<f64>> {
    positions
        .iter()
        .map(|position| coord(position))
        .collect::<Option<Vec<_>>>()
        .map(geo::LineString::new)
}

fn polygon(rings: &[Vec<Position>]) -> Option<geo::Polygon<f64>> {
    let mut converted = rings
        .iter()
        .map(|ring| line(ring))
        .collect::<Option<Vec<_>>>()?
        .into_iter();
    let exterior = converted
        .next()
        .unwrap_or_else(|| geo::LineString::new(Vec::new()));
    Some(geo::Polygon::new(exterior, converted.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn reads_feature_collection() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "id": 7,
                "geometry": { "type": "Point", "coordinates": [13.4, 52.5] },
                "properties": { "name": "Berlin" },
            }],
        });
        let shape = Shape::from_value(&value).expect("valid collection");
        assert_eq!(shape.geometries().len(), 1);
        assert_eq!(shape.to_value(), value);
    }

    #[rstest]
    fn unmodelled_members_are_forwarded_unchanged() {
        let value = json!({
            "type": "FeatureCollection",
            "name": "parks",
            "bbox": [0, 0, 1, 1],
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [0, 1], "crs": "local" },
                "bbox": [0, 1, 0, 1],
            }],
        });
        let shape = Shape::from_value(&value).expect("valid collection");
        assert_eq!(shape.to_value(), value);
        assert_eq!(serde_json::to_value(&shape).ok(), Some(value));

        let ShapeDocument::FeatureCollection(collection) = shape.document() else {
            panic!("expected a feature collection");
        };
        assert_eq!(collection.bbox, Some(vec![0.0, 0.0, 1.0, 1.0]));
        let feature = collection.features.first().expect("one feature");
        assert!(feature.properties.is_none());
    }

    #[rstest]
    fn geometry_text_keeps_its_members() {
        let text = r#"{"type":"LineString","coordinates":[[0,0],[1,1]],"bbox":[0,0,1,1]}"#;
        let shape: Shape = text.parse().expect("valid line");
        let expected: Value = serde_json::from_str(text).expect("valid JSON");
        assert_eq!(shape.into_value(), expected);
    }

    #[rstest]
    fn feature_with_null_geometry_is_accepted() {
        let shape: Shape = r#"{"type":"Feature","geometry":null,"properties":null}"#
            .parse()
            .expect("unlocated feature");
        assert!(shape.geometries().is_empty());
    }

    #[rstest]
    #[case(r#"{"type":"Point","coordinates":[1]}"#)]
    #[case(r#"{"type":"Polygon","coordinates":[[[0,0],[1]]]}"#)]
    fn short_positions_are_rejected(#[case] text: &str) {
        assert!(matches!(
            text.parse::<Shape>(),
            Err(ShapeError::ShortPosition { len: 1 })
        ));
    }

    #[rstest]
    #[case("not json", "Json")]
    #[case(r#"{"coordinates":[0,0]}"#, "MissingType")]
    #[case(r#"{"type":"Circle"}"#, "UnknownType")]
    #[case(r#"{"type":"LineString","coordinates":"0,0"}"#, "Malformed")]
    #[case(r#"{"type":"FeatureCollection"}"#, "Malformed")]
    fn malformed_documents_are_rejected(#[case] text: &str, #[case] expected: &str) {
        let err = text.parse::<Shape>().expect_err("document should be rejected");
        let matched = match err {
            ShapeError::Json { .. } => "Json",
            ShapeError::MissingType => "MissingType",
            ShapeError::UnknownType { .. } => "UnknownType",
            ShapeError::Malformed { .. } => "Malformed",
            ShapeError::ShortPosition { .. } => "ShortPosition",
        };
        assert_eq!(matched, expected);
    }

    #[rstest]
    fn polygon_converts_rings() {
        let shape: Shape = r#"{"type":"Polygon","coordinates":[
            [[0,0],[4,0],[4,4],[0,4],[0,0]],
            [[1,1],[2,1],[2,2],[1,1]]
        ]}"#
        .parse()
        .expect("valid polygon");
        let ShapeDocument::Geometry(geometry) = shape.document() else {
            panic!("expected a bare geometry");
        };
        let Some(geo::Geometry::Polygon(polygon)) = geometry.to_geo() else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_eq!(polygon.interiors().len(), 1);
    }

    #[rstest]
    fn hand_built_short_position_does_not_convert() {
        let point = Geometry::Point {
            coordinates: vec![1.0],
        };
        assert!(point.to_geo().is_none());
    }
}
