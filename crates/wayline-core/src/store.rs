//! Route ownership and structural mutation.
//!
//! [`RouteStore`] owns the one live [`Route`] plus the saved-routes
//! list. Every structural mutation persists the result through the
//! injected [`Gateway`] and returns the outcome, so callers can see a
//! failed save instead of silently losing it; the in-memory mutation
//! is never rolled back on persist failure.
//!
//! Insertion decisions are delegated to [`crate::geometry`]: a point
//! near an existing segment is inserted mid-route, anything else is
//! appended.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::gateway::{CURRENT_ROUTE_KEY, Gateway, GatewayError, SAVED_ROUTES_KEY};
use crate::geometry;
use crate::region;
use crate::types::{Coordinate, Region, Route, SavedRoute};

/// Default proximity threshold for [`RouteStore::insert_near`],
/// degrees.
///
/// Inherited from the original sketching UI as a fixed constant that
/// ignores zoom level; kept configurable via [`StoreConfig`] but
/// deliberately not zoom-corrected.
pub const DEFAULT_INSERT_THRESHOLD: f64 = 0.01;

/// Tunable parameters for a [`RouteStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    /// Proximity threshold for the insert-near policy, degrees.
    pub insert_threshold: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            insert_threshold: DEFAULT_INSERT_THRESHOLD,
        }
    }
}

/// Errors from route-store operations.
///
/// `Gateway` and `Encode` are reported *after* the in-memory mutation
/// has been applied: the edit succeeded but durability did not.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An edit referenced an index outside `[0, len)`.
    #[error("index {index} out of bounds for list of {len} entries")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// The list length at the time of the call.
        len: usize,
    },

    /// The payload could not be serialized for persistence.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The persistence backend rejected the write.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Owner of the live route and the saved-routes list.
///
/// Construct one per session with [`open`](Self::open) and pass it by
/// reference to whatever needs it; there is no ambient shared state.
pub struct RouteStore<G> {
    route: Route,
    saved: Vec<SavedRoute>,
    gateway: G,
    config: StoreConfig,
}

impl<G: Gateway> RouteStore<G> {
    /// Open a store, loading any previously persisted state.
    ///
    /// Absent keys yield empty state. Malformed payloads and read
    /// failures are recovered locally to empty state with a warning;
    /// they are never propagated, so a store always opens.
    pub fn open(gateway: G, config: StoreConfig) -> Self {
        let route = load_or_default(&gateway, CURRENT_ROUTE_KEY);
        let saved = load_or_default(&gateway, SAVED_ROUTES_KEY);
        Self {
            route,
            saved,
            gateway,
            config,
        }
    }

    /// The live route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// The saved-routes list, oldest first.
    #[must_use]
    pub fn saved_routes(&self) -> &[SavedRoute] {
        &self.saved
    }

    /// The injected persistence backend.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Consumes the store and returns the gateway.
    #[must_use]
    pub fn into_gateway(self) -> G {
        self.gateway
    }

    /// An independent copy of the live route.
    ///
    /// Required before starting an animation: later edits to the live
    /// route cannot perturb the copy.
    #[must_use]
    pub fn snapshot(&self) -> Route {
        self.route.clone()
    }

    /// Fit a viewport to the live route (see [`region::fit`]).
    #[must_use]
    pub fn region(&self, default: Region) -> Region {
        region::fit(&self.route, default)
    }

    /// Append `point` at the end of the route.
    ///
    /// # Errors
    ///
    /// The append itself always succeeds; an error reports a failed
    /// persist of the already-applied mutation.
    pub fn append(&mut self, point: Coordinate) -> Result<(), StoreError> {
        self.route.push(point);
        self.persist_route()
    }

    /// Insert `point` into the route using the tap-to-edit policy.
    ///
    /// With at least two points and a segment strictly within the
    /// configured threshold, the point is inserted immediately after
    /// the nearest segment's start index (between that segment's
    /// endpoints). Otherwise it is appended at the end.
    ///
    /// # Errors
    ///
    /// Persist failure of the already-applied mutation.
    pub fn insert_near(&mut self, point: Coordinate) -> Result<(), StoreError> {
        if geometry::is_near_any_segment(point, &self.route, self.config.insert_threshold)
            && let Some(i) = geometry::nearest_segment_index(point, &self.route)
        {
            self.route.insert(i + 1, point);
        } else {
            self.route.push(point);
        }
        self.persist_route()
    }

    /// Delete the point at `index`, shifting later indices down.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidIndex`] (before any mutation or persist)
    /// if `index` is out of bounds; otherwise persist failure of the
    /// applied mutation.
    pub fn remove_at(&mut self, index: usize) -> Result<(), StoreError> {
        check_index(index, self.route.len())?;
        self.route.remove(index);
        self.persist_route()
    }

    /// Replace the point at `index` in place, preserving order.
    ///
    /// # Errors
    ///
    /// As for [`remove_at`](Self::remove_at).
    pub fn move_to(&mut self, index: usize, point: Coordinate) -> Result<(), StoreError> {
        check_index(index, self.route.len())?;
        self.route.replace(index, point);
        self.persist_route()
    }

    /// Empty the live route.
    ///
    /// # Errors
    ///
    /// Persist failure of the already-applied mutation.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.route.clear();
        self.persist_route()
    }

    /// Append a snapshot of the live route to the saved list.
    ///
    /// `saved_at` is an opaque human-readable label; formatting is the
    /// caller's concern.
    ///
    /// # Errors
    ///
    /// Persist failure of the already-applied mutation.
    pub fn save_current(
        &mut self,
        name: Option<String>,
        saved_at: String,
    ) -> Result<(), StoreError> {
        let entry = SavedRoute {
            coordinates: self.snapshot(),
            name,
            saved_at,
        };
        self.saved.push(entry);
        self.persist_saved()
    }

    /// Rename the saved route at `index`.
    ///
    /// The only in-place edit a saved route permits.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidIndex`] if `index` is out of bounds;
    /// otherwise persist failure of the applied mutation.
    pub fn rename_saved(&mut self, index: usize, name: String) -> Result<(), StoreError> {
        check_index(index, self.saved.len())?;
        self.saved[index].name = Some(name);
        self.persist_saved()
    }

    /// Delete the saved route at `index`.
    ///
    /// # Errors
    ///
    /// As for [`rename_saved`](Self::rename_saved).
    pub fn delete_saved(&mut self, index: usize) -> Result<(), StoreError> {
        check_index(index, self.saved.len())?;
        self.saved.remove(index);
        self.persist_saved()
    }

    /// Replace the live route with a copy of the saved route at
    /// `index`, so it can be edited or replayed.
    ///
    /// # Errors
    ///
    /// As for [`rename_saved`](Self::rename_saved).
    pub fn restore_saved(&mut self, index: usize) -> Result<(), StoreError> {
        check_index(index, self.saved.len())?;
        self.route = self.saved[index].coordinates.clone();
        self.persist_route()
    }

    fn persist_route(&mut self) -> Result<(), StoreError> {
        persist(&mut self.gateway, CURRENT_ROUTE_KEY, &self.route)
    }

    fn persist_saved(&mut self) -> Result<(), StoreError> {
        persist(&mut self.gateway, SAVED_ROUTES_KEY, &self.saved)
    }
}

/// Bounds check shared by the edit operations.
const fn check_index(index: usize, len: usize) -> Result<(), StoreError> {
    if index < len {
        Ok(())
    } else {
        Err(StoreError::InvalidIndex { index, len })
    }
}

/// Serialize `value` and hand it to the gateway.
fn persist<G: Gateway, T: Serialize>(
    gateway: &mut G,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value)?;
    gateway.save(key, &bytes)?;
    Ok(())
}

/// Load and decode a persisted payload, recovering to `T::default()`
/// on absence, read failure, or malformed JSON.
fn load_or_default<G: Gateway, T: DeserializeOwned + Default>(gateway: &G, key: &str) -> T {
    match gateway.load(key) {
        Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            log::warn!("discarding malformed payload under {key:?}: {e}");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("failed to read {key:?}, starting empty: {e}");
            T::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;

    /// In-memory gateway with failure injection and a save counter.
    #[derive(Debug, Default)]
    struct TestGateway {
        entries: HashMap<String, Vec<u8>>,
        fail_writes: Cell<bool>,
        saves: Cell<usize>,
    }

    impl Gateway for TestGateway {
        fn load(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
            Ok(self.entries.get(key).cloned())
        }

        fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), GatewayError> {
            if self.fail_writes.get() {
                return Err(GatewayError::Write("injected failure".to_string()));
            }
            self.entries.insert(key.to_string(), bytes.to_vec());
            self.saves.set(self.saves.get() + 1);
            Ok(())
        }
    }

    fn open_empty() -> RouteStore<TestGateway> {
        RouteStore::open(TestGateway::default(), StoreConfig::default())
    }

    #[test]
    fn opens_empty_when_nothing_persisted() {
        let store = open_empty();
        assert!(store.route().is_empty());
        assert!(store.saved_routes().is_empty());
    }

    #[test]
    fn append_grows_route_and_persists() {
        let mut store = open_empty();
        store.append(Coordinate::new(1.0, 2.0)).unwrap();
        store.append(Coordinate::new(3.0, 4.0)).unwrap();
        assert_eq!(store.route().len(), 2);

        let bytes = store.gateway().entries.get(CURRENT_ROUTE_KEY).unwrap();
        let persisted: Route = serde_json::from_slice(bytes).unwrap();
        assert_eq!(&persisted, store.route());
    }

    #[test]
    fn insert_near_splits_the_closest_segment() {
        let mut store = open_empty();
        store.append(Coordinate::new(0.0, 0.0)).unwrap();
        store.append(Coordinate::new(10.0, 0.0)).unwrap();

        store.insert_near(Coordinate::new(5.0, 0.001)).unwrap();
        assert_eq!(
            store.route().points(),
            &[
                Coordinate::new(0.0, 0.0),
                Coordinate::new(5.0, 0.001),
                Coordinate::new(10.0, 0.0),
            ]
        );
    }

    #[test]
    fn insert_near_far_from_line_appends() {
        let mut store = open_empty();
        store.append(Coordinate::new(0.0, 0.0)).unwrap();
        store.append(Coordinate::new(10.0, 0.0)).unwrap();

        store.insert_near(Coordinate::new(5.0, 5.0)).unwrap();
        assert_eq!(
            store.route().points(),
            &[
                Coordinate::new(0.0, 0.0),
                Coordinate::new(10.0, 0.0),
                Coordinate::new(5.0, 5.0),
            ]
        );
    }

    #[test]
    fn insert_near_short_route_appends() {
        let mut store = open_empty();
        store.insert_near(Coordinate::new(1.0, 1.0)).unwrap();
        store.insert_near(Coordinate::new(1.0, 1.0)).unwrap();
        assert_eq!(store.route().len(), 2);
    }

    #[test]
    fn insert_near_respects_configured_threshold() {
        let config = StoreConfig {
            insert_threshold: 1.0,
        };
        let mut store = RouteStore::open(TestGateway::default(), config);
        store.append(Coordinate::new(0.0, 0.0)).unwrap();
        store.append(Coordinate::new(10.0, 0.0)).unwrap();

        // 0.5 away: outside the default 0.01 threshold but inside 1.0.
        store.insert_near(Coordinate::new(5.0, 0.5)).unwrap();
        assert_eq!(store.route().points()[1], Coordinate::new(5.0, 0.5));
    }

    #[test]
    fn remove_at_shifts_later_points_down() {
        let mut store = open_empty();
        store.append(Coordinate::new(0.0, 0.0)).unwrap();
        store.append(Coordinate::new(1.0, 1.0)).unwrap();
        store.append(Coordinate::new(2.0, 2.0)).unwrap();

        store.remove_at(1).unwrap();
        assert_eq!(
            store.route().points(),
            &[Coordinate::new(0.0, 0.0), Coordinate::new(2.0, 2.0)]
        );
    }

    #[test]
    fn remove_at_out_of_bounds_is_rejected_before_mutation() {
        let mut store = open_empty();
        store.append(Coordinate::new(0.0, 0.0)).unwrap();
        let saves_before = store.gateway().saves.get();

        let err = store.remove_at(1).unwrap_err();
        assert!(matches!(err, StoreError::InvalidIndex { index: 1, len: 1 }));
        assert_eq!(store.route().len(), 1);
        // The failed edit must not have triggered a persist.
        assert_eq!(store.gateway().saves.get(), saves_before);
    }

    #[test]
    fn move_to_replaces_in_place() {
        let mut store = open_empty();
        store.append(Coordinate::new(0.0, 0.0)).unwrap();
        store.append(Coordinate::new(1.0, 1.0)).unwrap();

        store.move_to(0, Coordinate::new(-1.0, -1.0)).unwrap();
        assert_eq!(
            store.route().points(),
            &[Coordinate::new(-1.0, -1.0), Coordinate::new(1.0, 1.0)]
        );
        assert!(matches!(
            store.move_to(2, Coordinate::new(0.0, 0.0)),
            Err(StoreError::InvalidIndex { index: 2, len: 2 })
        ));
    }

    #[test]
    fn clear_empties_and_persists_empty_array() {
        let mut store = open_empty();
        store.append(Coordinate::new(1.0, 1.0)).unwrap();
        store.clear().unwrap();
        assert!(store.route().is_empty());

        let bytes = store.gateway().entries.get(CURRENT_ROUTE_KEY).unwrap();
        assert_eq!(bytes.as_slice(), b"[]");
    }

    #[test]
    fn snapshot_is_independent_of_later_edits() {
        let mut store = open_empty();
        store.append(Coordinate::new(1.0, 1.0)).unwrap();
        let snapshot = store.snapshot();

        store.append(Coordinate::new(2.0, 2.0)).unwrap();
        store.move_to(0, Coordinate::new(9.0, 9.0)).unwrap();

        assert_eq!(snapshot.points(), &[Coordinate::new(1.0, 1.0)]);
    }

    #[test]
    fn persist_failure_is_surfaced_but_edit_sticks() {
        let mut store = open_empty();
        store.gateway().fail_writes.set(true);

        let err = store.append(Coordinate::new(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, StoreError::Gateway(GatewayError::Write(_))));
        // The in-memory mutation is not rolled back.
        assert_eq!(store.route().len(), 1);
    }

    #[test]
    fn malformed_payload_recovers_to_empty() {
        let mut gateway = TestGateway::default();
        gateway
            .entries
            .insert(CURRENT_ROUTE_KEY.to_string(), b"not json".to_vec());
        gateway
            .entries
            .insert(SAVED_ROUTES_KEY.to_string(), b"{\"wrong\":1}".to_vec());

        let store = RouteStore::open(gateway, StoreConfig::default());
        assert!(store.route().is_empty());
        assert!(store.saved_routes().is_empty());
    }

    #[test]
    fn reopen_restores_route_and_saved_list() {
        let mut store = open_empty();
        store.append(Coordinate::new(1.0, 2.0)).unwrap();
        store
            .save_current(Some("loop".to_string()), "01/02/26, 09:30".to_string())
            .unwrap();

        let gateway = store.into_gateway();
        let reopened = RouteStore::open(gateway, StoreConfig::default());
        assert_eq!(reopened.route().points(), &[Coordinate::new(1.0, 2.0)]);
        assert_eq!(reopened.saved_routes().len(), 1);
        assert_eq!(reopened.saved_routes()[0].name.as_deref(), Some("loop"));
    }

    #[test]
    fn save_current_captures_a_snapshot() {
        let mut store = open_empty();
        store.append(Coordinate::new(1.0, 1.0)).unwrap();
        store.save_current(None, "today".to_string()).unwrap();

        // Editing the live route must not change the saved entry.
        store.append(Coordinate::new(2.0, 2.0)).unwrap();
        assert_eq!(store.saved_routes()[0].coordinates.len(), 1);
        assert_eq!(store.saved_routes()[0].saved_at, "today");
    }

    #[test]
    fn rename_saved_edits_only_the_name() {
        let mut store = open_empty();
        store.append(Coordinate::new(1.0, 1.0)).unwrap();
        store.save_current(None, "today".to_string()).unwrap();

        store.rename_saved(0, "renamed".to_string()).unwrap();
        assert_eq!(store.saved_routes()[0].name.as_deref(), Some("renamed"));
        assert_eq!(store.saved_routes()[0].coordinates.len(), 1);

        assert!(matches!(
            store.rename_saved(5, "nope".to_string()),
            Err(StoreError::InvalidIndex { index: 5, len: 1 })
        ));
    }

    #[test]
    fn delete_saved_removes_the_entry() {
        let mut store = open_empty();
        store.save_current(Some("a".to_string()), "t1".to_string()).unwrap();
        store.save_current(Some("b".to_string()), "t2".to_string()).unwrap();

        store.delete_saved(0).unwrap();
        assert_eq!(store.saved_routes().len(), 1);
        assert_eq!(store.saved_routes()[0].name.as_deref(), Some("b"));

        assert!(matches!(
            store.delete_saved(1),
            Err(StoreError::InvalidIndex { index: 1, len: 1 })
        ));
    }

    #[test]
    fn restore_saved_replaces_the_live_route() {
        let mut store = open_empty();
        store.append(Coordinate::new(1.0, 1.0)).unwrap();
        store.save_current(None, "t".to_string()).unwrap();
        store.clear().unwrap();

        store.restore_saved(0).unwrap();
        assert_eq!(store.route().points(), &[Coordinate::new(1.0, 1.0)]);

        // The restored route persists as the current route.
        let bytes = store.gateway().entries.get(CURRENT_ROUTE_KEY).unwrap();
        let persisted: Route = serde_json::from_slice(bytes).unwrap();
        assert_eq!(persisted.len(), 1);
    }
}
