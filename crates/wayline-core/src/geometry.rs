//! Point-to-segment distance and nearest-segment lookup.
//!
//! All functions treat latitude/longitude as planar x/y. This is
//! implemented from scratch (~40 lines) to avoid pulling in a geometry
//! crate dependency tree for three small total functions; the planar
//! simplification is acceptable at the city scales routes are sketched
//! at.
//!
//! These functions drive the tap-to-edit policy in
//! [`RouteStore::insert_near`](crate::store::RouteStore::insert_near):
//! a tap near the existing line inserts a vertex mid-route, a tap in
//! empty space appends one at the end.

use crate::types::{Coordinate, Route};

/// Planar distance from `point` to the segment between `start` and
/// `end`.
///
/// Projects `point` onto the infinite line through the segment and
/// clamps the projection parameter to `[0, 1]`, so the distance is
/// measured to the nearest point *on the segment*, not the line.
/// A degenerate segment (`start == end`) clamps the parameter to 0
/// and measures to `start`; there is no division by zero.
#[must_use]
pub fn distance_to_segment(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    let dlat = end.latitude - start.latitude;
    let dlon = end.longitude - start.longitude;
    let length_sq = dlat.mul_add(dlat, dlon * dlon);

    let t = if length_sq == 0.0 {
        // start and end coincide.
        0.0
    } else {
        let dot = (point.latitude - start.latitude)
            .mul_add(dlat, (point.longitude - start.longitude) * dlon);
        (dot / length_sq).clamp(0.0, 1.0)
    };

    let projection = Coordinate::new(
        t.mul_add(dlat, start.latitude),
        t.mul_add(dlon, start.longitude),
    );
    point.distance(projection)
}

/// Returns `true` iff `point` is strictly closer than `threshold` to
/// at least one segment of `route`.
///
/// A route with fewer than two points has no segments and always
/// returns `false`.
#[must_use]
pub fn is_near_any_segment(point: Coordinate, route: &Route, threshold: f64) -> bool {
    route
        .points()
        .windows(2)
        .any(|pair| distance_to_segment(point, pair[0], pair[1]) < threshold)
}

/// Returns the index `i` of the segment `(route[i], route[i+1])`
/// closest to `point`.
///
/// Ties resolve to the lowest index (first scan order). Returns `None`
/// for a route with fewer than two points.
#[must_use]
pub fn nearest_segment_index(point: Coordinate, route: &Route) -> Option<usize> {
    let mut nearest: Option<(usize, f64)> = None;

    for (i, pair) in route.points().windows(2).enumerate() {
        let d = distance_to_segment(point, pair[0], pair[1]);
        if nearest.is_none_or(|(_, best)| d < best) {
            nearest = Some((i, d));
        }
    }

    nearest.map(|(i, _)| i)
}
