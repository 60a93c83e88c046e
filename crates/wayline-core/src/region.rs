//! Viewport fitting: compute a bounding region for a route.

use crate::types::{Coordinate, Region, Route};

/// Minimum padding added to both deltas, degrees.
///
/// Guarantees a non-degenerate viewport: a single-point route yields
/// deltas of exactly this value.
pub const REGION_PADDING: f64 = 0.1;

/// Fallback viewport shown before anything is drawn (central
/// Stockholm).
pub const DEFAULT_REGION: Region = Region {
    center_latitude: 59.3293,
    center_longitude: 18.0686,
    latitude_delta: REGION_PADDING,
    longitude_delta: REGION_PADDING,
};

/// Fit a viewport to all points of `route`.
///
/// Returns `default` unchanged for an empty route. Otherwise the
/// region is centered on the bounding box midpoint with each delta
/// equal to the bounding box extent plus [`REGION_PADDING`], so the
/// full point set is visible with margin.
#[must_use]
pub fn fit(route: &Route, default: Region) -> Region {
    let mut points = route.points().iter();
    let Some(first) = points.next() else {
        return default;
    };

    let mut min = *first;
    let mut max = *first;
    for p in points {
        min = Coordinate::new(min.latitude.min(p.latitude), min.longitude.min(p.longitude));
        max = Coordinate::new(max.latitude.max(p.latitude), max.longitude.max(p.longitude));
    }

    Region {
        center_latitude: f64::midpoint(min.latitude, max.latitude),
        center_longitude: f64::midpoint(min.longitude, max.longitude),
        latitude_delta: (max.latitude - min.latitude) + REGION_PADDING,
        longitude_delta: (max.longitude - min.longitude) + REGION_PADDING,
    }
}
