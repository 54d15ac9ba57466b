//! Geographic primitives built from flat coordinate arrays.
//!
//! Coordinates are WGS84 with `x = longitude` and `y = latitude`. Inputs follow
//! GeoJSON ordering: bounds are `[west, south, east, north]` and corner pairs
//! are `[longitude, latitude]`. Values are passed through untouched; range
//! checks belong to the rendering engine.

use geo::{Coord, Rect};

/// A bounding box described by its south-west and north-east corners.
///
/// Unlike [`geo::Rect`] the corners are kept exactly as supplied, so an
/// inverted box survives the conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateBounds {
    /// South-west corner.
    pub sw: Coord<f64>,
    /// North-east corner.
    pub ne: Coord<f64>,
}

impl CoordinateBounds {
    /// Normalised rectangle covering the same corners.
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(self.sw, self.ne)
    }
}

/// Four arbitrary corners an image is warped onto.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateQuad {
    /// Top-left corner.
    pub top_left: Coord<f64>,
    /// Top-right corner.
    pub top_right: Coord<f64>,
    /// Bottom-right corner.
    pub bottom_right: Coord<f64>,
    /// Bottom-left corner.
    pub bottom_left: Coord<f64>,
}

/// Build bounds from `[west, south, east, north]`.
///
/// # Examples
/// ```
/// use cartosource_core::bounds_from_array;
/// use geo::Coord;
///
/// let bounds = bounds_from_array([-10.0, -5.0, 10.0, 5.0]);
/// assert_eq!(bounds.sw, Coord { x: -10.0, y: -5.0 });
/// assert_eq!(bounds.ne, Coord { x: 10.0, y: 5.0 });
/// ```
#[must_use]
pub const fn bounds_from_array(coordinates: [f64; 4]) -> CoordinateBounds {
    let [west, south, east, north] = coordinates;
    CoordinateBounds {
        sw: Coord { x: west, y: south },
        ne: Coord { x: east, y: north },
    }
}

/// Build a quad from `[top-left, top-right, bottom-right, bottom-left]`.
#[must_use]
pub const fn quad_from_array(coordinates: [[f64; 2]; 4]) -> CoordinateQuad {
    let [top_left, top_right, bottom_right, bottom_left] = coordinates;
    CoordinateQuad {
        top_left: lon_lat(top_left),
        top_right: lon_lat(top_right),
        bottom_right: lon_lat(bottom_right),
        bottom_left: lon_lat(bottom_left),
    }
}

const fn lon_lat(pair: [f64; 2]) -> Coord<f64> {
    let [x, y] = pair;
    Coord { x, y }
}
