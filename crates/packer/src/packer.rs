use crate::error::{PackError, Result};
use crate::walker::{PackContext, ReferenceWalker};
use mpdpack_library::LibraryStore;
use std::fs;
use std::path::Path;

/// The finished artifact: a suggested file name and the packed
/// multi-document content.
#[derive(Debug, Clone)]
pub struct PackedModel {
    pub file_name: String,
    pub content: String,
}

/// Packs a root model and everything it transitively references into
/// one self-contained document, prefixed with the materials block.
///
/// Holds only a reference to the read-only store; all mutable state
/// lives in a per-call [`PackContext`], so one `Packer` may serve
/// independent pack calls.
pub struct Packer<'a> {
    store: &'a LibraryStore,
}

impl<'a> Packer<'a> {
    pub fn new(store: &'a LibraryStore) -> Self {
        Self { store }
    }

    /// Pack root content supplied directly by the caller. The packed
    /// file name is `name` + `_Packed.mpd`.
    pub fn pack(&self, name: &str, content: &str) -> Result<PackedModel> {
        let materials = self.store.materials()?;
        let walker = ReferenceWalker::new(self.store);
        let mut ctx = PackContext::new();
        walker.walk_root(name, content, &mut ctx);
        assemble(name, materials, &ctx)
    }

    /// Pack a root given as a filesystem path: read it directly first,
    /// falling back to the library search under its file name when the
    /// direct read fails.
    pub fn pack_path(&self, path: &Path) -> Result<PackedModel> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| PackError::InvalidPath(path.display().to_string()))?
            .to_string();
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&file_name)
            .to_string();

        match fs::read_to_string(path) {
            Ok(content) => self.pack(&stem, &content),
            Err(err) => {
                log::debug!(
                    "direct read of {} failed ({err}), trying the library",
                    path.display()
                );
                self.pack_from_library(&stem, &file_name)
            }
        }
    }

    fn pack_from_library(&self, name: &str, file_name: &str) -> Result<PackedModel> {
        let materials = self.store.materials()?;
        let walker = ReferenceWalker::new(self.store);
        let mut ctx = PackContext::new();
        // Still the root: no document header, even when resolved
        // through the library search.
        walker.walk(file_name, true, &mut ctx);
        assemble(name, materials, &ctx)
    }
}

/// Concatenate materials and the discovered documents in reverse
/// append order. The root was appended last, so reversing puts it
/// first, which downstream consumers expect as the entry point.
fn assemble(name: &str, materials: String, ctx: &PackContext) -> Result<PackedModel> {
    let missing = ctx.missing();
    if !missing.is_empty() {
        return Err(PackError::ReferenceNotFound(missing));
    }

    let mut content = materials;
    if !content.ends_with('\n') {
        content.push('\n');
    }
    for document in ctx.documents().iter().rev() {
        content.push_str(&document.content);
    }
    if !content.ends_with('\n') {
        content.push('\n');
    }

    log::info!(
        "packed {name}: {} document(s), {} bytes",
        ctx.documents().len(),
        content.len()
    );
    Ok(PackedModel {
        file_name: format!("{name}_Packed.mpd"),
        content,
    })
}
