//! Shared types for the wayline route engine.

use serde::{Deserialize, Serialize};

/// A geographic point in degrees.
///
/// Values are treated as opaque numeric pairs: no range validation is
/// performed, and all distance math in this crate is planar
/// (latitude/longitude as Cartesian x/y). That is a deliberate
/// approximation valid at local/city scale, not geodesic distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Squared planar distance to another coordinate.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dlat = self.latitude - other.latitude;
        let dlon = self.longitude - other.longitude;
        dlat.mul_add(dlat, dlon * dlon)
    }

    /// Planar distance to another coordinate.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// An ordered sequence of coordinates forming a polyline.
///
/// Order is significant: it defines both the drawn line and the
/// animation path. Duplicate and collinear points are permitted, and
/// the empty route is valid ("nothing drawn yet").
///
/// Serializes as a bare JSON array of coordinates, so an empty route
/// round-trips as `[]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route(Vec<Coordinate>);

impl Route {
    /// Create a route from a vector of coordinates.
    #[must_use]
    pub const fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    /// Returns `true` if the route has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the route.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Coordinate> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Coordinate> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    /// Consumes the route and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Coordinate> {
        self.0
    }

    /// Appends a point at the end.
    pub fn push(&mut self, point: Coordinate) {
        self.0.push(point);
    }

    /// Inserts a point at `index`, shifting later points up.
    ///
    /// Callers must ensure `index <= len()`.
    pub fn insert(&mut self, index: usize, point: Coordinate) {
        self.0.insert(index, point);
    }

    /// Removes and returns the point at `index`, shifting later points
    /// down.
    ///
    /// Callers must ensure `index < len()`.
    pub fn remove(&mut self, index: usize) -> Coordinate {
        self.0.remove(index)
    }

    /// Replaces the point at `index` in place.
    ///
    /// Callers must ensure `index < len()`.
    pub fn replace(&mut self, index: usize, point: Coordinate) {
        self.0[index] = point;
    }

    /// Removes all points.
    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<Coordinate>> for Route {
    fn from(points: Vec<Coordinate>) -> Self {
        Self(points)
    }
}

/// A map viewport: center plus latitude/longitude span.
///
/// Deltas produced by [`fit`](crate::region::fit) are always at least
/// [`REGION_PADDING`](crate::region::REGION_PADDING), so even a
/// single-point route yields a non-degenerate viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Latitude of the viewport center, degrees.
    pub center_latitude: f64,
    /// Longitude of the viewport center, degrees.
    pub center_longitude: f64,
    /// Latitude span of the viewport, degrees.
    pub latitude_delta: f64,
    /// Longitude span of the viewport, degrees.
    pub longitude_delta: f64,
}

/// A route captured by an explicit save action.
///
/// Immutable once appended to the saved-routes list, except for
/// in-place `name` edits. The serialized field names match the
/// persisted JSON shape (`coordinates`, `name`, `savedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRoute {
    /// The captured route points.
    pub coordinates: Route,
    /// Optional user-assigned label.
    pub name: Option<String>,
    /// Human-readable capture timestamp.
    #[serde(rename = "savedAt")]
    pub saved_at: String,
}
