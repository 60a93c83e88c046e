//! Persistence gateway abstraction.
//!
//! The engine never touches storage directly -- durability goes through
//! the [`Gateway`] trait, which moves opaque byte payloads under string
//! keys. JSON shaping is the store's concern; backends only move bytes.
//! Filesystem and in-memory implementations live in `wayline-io`.

/// Storage key for the live route (JSON array of coordinates).
pub const CURRENT_ROUTE_KEY: &str = "currentRoute";

/// Storage key for the saved-routes list (JSON array of saved routes).
pub const SAVED_ROUTES_KEY: &str = "savedRoutes";

/// Errors reported by a persistence backend.
///
/// Backends reduce their native errors to strings so the trait stays
/// free of I/O types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// A read failed for a reason other than the key being absent.
    #[error("storage read failed: {0}")]
    Read(String),

    /// A write failed; the payload may or may not have been stored.
    #[error("storage write failed: {0}")]
    Write(String),
}

/// An opaque key/value byte store.
///
/// Absent keys are not errors: `load` returns `Ok(None)`. Write
/// ordering per key is the backend's responsibility; the engine issues
/// all calls from a single logical thread and never waits on one save
/// before permitting the next edit.
pub trait Gateway {
    /// Load the payload stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Read`] if the backend fails to read an
    /// existing entry.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError>;

    /// Store `bytes` under `key`, replacing any previous payload.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Write`] if the backend fails to persist
    /// the payload.
    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), GatewayError>;
}
