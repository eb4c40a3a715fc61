use crate::error::{LibraryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the materials definition at the library root.
pub const MATERIALS_FILE: &str = "LDConfig.ldr";

/// Conventional subdirectories a reference may live under, in search
/// priority order. The empty prefix probes the library root itself.
pub const SEARCH_PREFIXES: &[&str] = &["", "parts/", "p/", "models/"];

/// Read-only handle on an LDraw library directory tree.
pub struct LibraryStore {
    root: PathBuf,
}

impl LibraryStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the materials definitions. Mandatory for every pack; a
    /// missing or unreadable file makes the whole library unavailable.
    pub fn materials(&self) -> Result<String> {
        let path = self.root.join(MATERIALS_FILE);
        fs::read_to_string(&path).map_err(|source| LibraryError::Unavailable { path, source })
    }

    /// Capability query: can this store serve pack requests right now?
    /// No side effects.
    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        self.root.is_dir() && self.root.join(MATERIALS_FILE).is_file()
    }

    /// Snapshot of the store's readiness, suitable for health reporting.
    #[must_use]
    pub fn status(&self) -> LibraryStatus {
        LibraryStatus {
            root: self.root.clone(),
            provisioned: self.is_provisioned(),
            materials_present: self.root.join(MATERIALS_FILE).is_file(),
            parts_present: self.root.join("parts").is_dir(),
            primitives_present: self.root.join("p").is_dir(),
            models_present: self.root.join("models").is_dir(),
        }
    }
}

/// Snapshot reported by [`LibraryStore::status`] so callers (CLI,
/// health endpoints) can explain why a library is not serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryStatus {
    pub root: PathBuf,
    pub provisioned: bool,
    pub materials_present: bool,
    pub parts_present: bool,
    pub primitives_present: bool,
    pub models_present: bool,
}
