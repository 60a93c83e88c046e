//! Filesystem-backed persistence gateway.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use wayline_core::{Gateway, GatewayError};

/// A [`Gateway`] that stores each key as one `<key>.json` file under a
/// root directory.
///
/// The directory is created on the first save. Keys are used verbatim
/// as file stems; the engine only uses short alphanumeric keys.
#[derive(Debug, Clone)]
pub struct FsGateway {
    root: PathBuf,
}

impl FsGateway {
    /// Create a gateway rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory payloads are stored under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl Gateway for FsGateway {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, GatewayError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GatewayError::Read(e.to_string())),
        }
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), GatewayError> {
        std::fs::create_dir_all(&self.root).map_err(|e| GatewayError::Write(e.to_string()))?;
        std::fs::write(self.path_for(key), bytes).map_err(|e| GatewayError::Write(e.to_string()))
    }
}
