use crate::store::{LibraryStore, SEARCH_PREFIXES};
use std::fs;

/// A successfully located reference: its content plus the prefix-
/// qualified relative path it was actually found under.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub content: String,
    pub canonical_path: String,
}

/// Trim a reference name and normalize its path separators to `/`.
/// Reference names inside model files may use either convention.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().replace('\\', "/")
}

/// Locates reference names in a [`LibraryStore`].
///
/// Library layouts are not consistent in casing or prefixing across
/// distributions, so each name is probed under every conventional
/// prefix, and the whole sequence is retried lowercased when the
/// original spelling fails everywhere.
pub struct PathResolver<'a> {
    store: &'a LibraryStore,
}

impl<'a> PathResolver<'a> {
    pub fn new(store: &'a LibraryStore) -> Self {
        Self { store }
    }

    /// Resolve `name` against the store. `None` means all candidate
    /// locations failed in both the original and lowercased spelling;
    /// the caller decides what to record about the failure.
    pub fn resolve(&self, name: &str) -> Option<Resolved> {
        let normalized = normalize_name(name);
        if let Some(resolved) = self.resolve_pass(&normalized) {
            return Some(resolved);
        }
        let lowered = normalized.to_lowercase();
        if lowered == normalized {
            return None;
        }
        self.resolve_pass(&lowered)
    }

    fn resolve_pass(&self, name: &str) -> Option<Resolved> {
        for prefix in SEARCH_PREFIXES {
            let candidate = self.store.root().join(prefix).join(name);
            match fs::read_to_string(&candidate) {
                Ok(content) => {
                    log::debug!("resolved {name} at {}", candidate.display());
                    return Some(Resolved {
                        content,
                        canonical_path: format!("{prefix}{name}"),
                    });
                }
                Err(err) => {
                    log::trace!("candidate {} failed: {err}", candidate.display());
                }
            }
        }
        None
    }
}
