//! wayline-core: route geometry and animation playback engine (sans-IO).
//!
//! A route is an ordered polyline of geographic points. This crate
//! decides where a newly tapped point belongs on an existing route,
//! fits a viewing region to a point set, owns the route and its
//! saved copies, and drives a cancellation-safe, restartable marker
//! animation along a route snapshot.
//!
//! This crate has **no I/O dependencies** -- durability goes through
//! the [`Gateway`] trait and time through the [`Clock`] trait.
//! Filesystem and wall-clock bindings live in `wayline-io` and the
//! CLI driver.
//!
//! All distance math is planar (latitude/longitude as Cartesian x/y),
//! a documented approximation valid at the city scales routes are
//! sketched at.

pub mod animation;
pub mod gateway;
pub mod geometry;
pub mod region;
pub mod store;
pub mod types;

pub use animation::{
    AnimationController, AnimationError, Clock, PlaybackState, RESET_GRACE, RunToken,
    position_along,
};
pub use gateway::{CURRENT_ROUTE_KEY, Gateway, GatewayError, SAVED_ROUTES_KEY};
pub use region::{DEFAULT_REGION, REGION_PADDING};
pub use store::{DEFAULT_INSERT_THRESHOLD, RouteStore, StoreConfig, StoreError};
pub use types::{Coordinate, Region, Route, SavedRoute};
