//! In-memory persistence gateway.

use std::cell::Cell;
use std::collections::HashMap;

use wayline_core::{Gateway, GatewayError};

/// A [`Gateway`] backed by a `HashMap`.
///
/// Useful for ephemeral sessions and for tests: writes can be made to
/// fail on demand with [`set_fail_writes`](Self::set_fail_writes) to
/// exercise persist-failure paths.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    entries: HashMap<String, Vec<u8>>,
    fail_writes: Cell<bool>,
}

impl MemoryGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. to simulate previously persisted
    /// state.
    pub fn seed(&mut self, key: &str, bytes: &[u8]) {
        self.entries.insert(key.to_string(), bytes.to_vec());
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// The payload currently stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }
}

impl Gateway for MemoryGateway {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), GatewayError> {
        if self.fail_writes.get() {
            return Err(GatewayError::Write("writes disabled".to_string()));
        }
        self.entries.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
