use crate::line::{classify, strip_indent, LineKind};
use mpdpack_library::{normalize_name, LibraryStore, PathResolver, Resolved};
use std::collections::HashMap;

/// One document discovered during a walk: the canonical path it was
/// found under and its rewritten content.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: String,
    pub content: String,
}

/// Mutable state threaded through one pack operation. Never shared
/// across packs; every request constructs a fresh context.
#[derive(Debug, Default)]
pub struct PackContext {
    /// Reference name (exact spelling as first seen) to canonical path.
    /// A name is inserted at most once; presence means "resolved or
    /// already inline".
    resolved: HashMap<String, String>,
    /// Names whose lowercased retry also failed, in discovery order.
    not_found: Vec<String>,
    /// Post-order document sequence: children precede their parent.
    documents: Vec<Document>,
}

impl PackContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.resolved.contains_key(name)
    }

    /// Names that stayed unresolved through the whole walk. A not-found
    /// entry is excused only when its exact original spelling was later
    /// resolved (or declared inline) elsewhere.
    #[must_use]
    pub fn missing(&self) -> Vec<String> {
        self.not_found
            .iter()
            .filter(|name| !self.resolved.contains_key(name.as_str()))
            .cloned()
            .collect()
    }
}

/// Recursive discovery of every file transitively referenced from a
/// root, producing a self-identifying rewritten document per file.
pub struct ReferenceWalker<'a> {
    resolver: PathResolver<'a>,
}

impl<'a> ReferenceWalker<'a> {
    pub fn new(store: &'a LibraryStore) -> Self {
        Self {
            resolver: PathResolver::new(store),
        }
    }

    /// Walk root content supplied by the caller; the root itself is
    /// never searched in the library. Returns the root's canonical
    /// path (its normalized name, no library prefix).
    pub fn walk_root(&self, name: &str, content: &str, ctx: &mut PackContext) -> String {
        let canonical = normalize_name(name);
        self.rewrite(&canonical, content, true, ctx);
        canonical
    }

    /// Resolve `name` in the library and walk its content. `None`
    /// means every candidate location failed; the original spelling is
    /// recorded in the not-found list.
    pub fn walk(&self, name: &str, is_root: bool, ctx: &mut PackContext) -> Option<String> {
        let Some(Resolved {
            content,
            canonical_path,
        }) = self.resolver.resolve(name)
        else {
            log::warn!("reference {name} not found in library");
            ctx.not_found.push(name.to_string());
            return None;
        };
        self.rewrite(&canonical_path, &content, is_root, ctx);
        Some(canonical_path)
    }

    fn rewrite(&self, canonical: &str, content: &str, is_root: bool, ctx: &mut PackContext) {
        let content = content.replace("\r\n", "\n");
        let mut output = String::new();
        if !is_root {
            // Every embedded document identifies itself in the packed
            // artifact.
            output.push_str("0 FILE ");
            output.push_str(canonical);
            output.push('\n');
        }

        for (index, raw) in content.lines().enumerate() {
            let line = strip_indent(raw);
            match classify(line) {
                LineKind::SelfDeclaration { name } => {
                    // The root's own leading declaration is dropped;
                    // the walker supplies document headers itself.
                    if is_root && index == 0 {
                        continue;
                    }
                    // Inline sub-document: already embedded, nothing
                    // to fetch.
                    ctx.resolved.entry(name.clone()).or_insert(name);
                }
                LineKind::Placement { name } => {
                    if !ctx.resolved.contains_key(&name) {
                        if let Some(found) = self.walk(&name, false, ctx) {
                            ctx.resolved.insert(name, found);
                        }
                    }
                }
                LineKind::Other => {}
            }
            output.push_str(line);
            output.push('\n');
        }

        // Post-order: recursion for children has already appended them.
        ctx.documents.push(Document {
            path: canonical.to_string(),
            content: output,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn placement(name: &str) -> String {
        format!("1 16 0 0 0 1 0 0 0 1 0 0 0 1 {name}\n")
    }

    #[test]
    fn children_are_appended_before_their_parent() {
        let temp = tempdir().unwrap();
        write(temp.path(), "parts/wheel.ldr", &placement("stud.dat"));
        write(temp.path(), "p/stud.dat", "0 stud\n");

        let store = LibraryStore::new(temp.path());
        let walker = ReferenceWalker::new(&store);
        let mut ctx = PackContext::new();
        walker.walk_root("car.ldr", &placement("wheel.ldr"), &mut ctx);

        let paths: Vec<&str> = ctx.documents().iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["p/stud.dat", "parts/wheel.ldr", "car.ldr"]);
    }

    #[test]
    fn embedded_documents_get_a_header_and_the_root_does_not() {
        let temp = tempdir().unwrap();
        write(temp.path(), "parts/3001.dat", "0 brick\n");

        let store = LibraryStore::new(temp.path());
        let walker = ReferenceWalker::new(&store);
        let mut ctx = PackContext::new();
        walker.walk_root("car.ldr", &placement("3001.dat"), &mut ctx);

        assert_eq!(
            ctx.documents()[0].content,
            "0 FILE parts/3001.dat\n0 brick\n"
        );
        assert_eq!(ctx.documents()[1].content, placement("3001.dat"));
    }

    #[test]
    fn repeated_references_resolve_once() {
        let temp = tempdir().unwrap();
        write(temp.path(), "parts/3001.dat", "0 brick\n");

        let store = LibraryStore::new(temp.path());
        let walker = ReferenceWalker::new(&store);
        let mut ctx = PackContext::new();
        let root = format!("{}{}", placement("3001.dat"), placement("3001.dat"));
        walker.walk_root("car.ldr", &root, &mut ctx);

        // One brick document plus the root, no second fetch.
        assert_eq!(ctx.documents().len(), 2);
        assert!(ctx.is_resolved("3001.dat"));
    }

    #[test]
    fn self_declarations_register_in_place_without_fetching() {
        let store = LibraryStore::new("/nonexistent");
        let walker = ReferenceWalker::new(&store);
        let mut ctx = PackContext::new();
        walker.walk_root(
            "set.mpd",
            "0 set\n0 FILE sub.ldr\n0 sub body\n0 FILE sub.ldr\n",
            &mut ctx,
        );

        assert!(ctx.is_resolved("sub.ldr"));
        assert!(ctx.missing().is_empty());
        // Declaration lines pass through unchanged.
        assert_eq!(
            ctx.documents()[0].content,
            "0 set\n0 FILE sub.ldr\n0 sub body\n0 FILE sub.ldr\n"
        );
    }

    #[test]
    fn roots_leading_self_declaration_is_dropped() {
        let store = LibraryStore::new("/nonexistent");
        let walker = ReferenceWalker::new(&store);
        let mut ctx = PackContext::new();
        walker.walk_root("set.mpd", "0 FILE set.mpd\n0 body\n", &mut ctx);

        assert_eq!(ctx.documents()[0].content, "0 body\n");
    }

    #[test]
    fn unresolved_reference_keeps_the_line_and_records_the_name() {
        let store = LibraryStore::new("/nonexistent");
        let walker = ReferenceWalker::new(&store);
        let mut ctx = PackContext::new();
        let root = placement("Missing.dat");
        walker.walk_root("car.ldr", &root, &mut ctx);

        assert_eq!(ctx.documents()[0].content, root);
        assert_eq!(ctx.missing(), vec!["Missing.dat".to_string()]);
    }

    #[test]
    fn crlf_content_is_rewritten_with_plain_newlines() {
        let store = LibraryStore::new("/nonexistent");
        let walker = ReferenceWalker::new(&store);
        let mut ctx = PackContext::new();
        walker.walk_root("car.ldr", "0 a\r\n0 b\r\n", &mut ctx);

        assert_eq!(ctx.documents()[0].content, "0 a\n0 b\n");
    }

    #[test]
    fn leading_indentation_is_stripped_from_rewritten_lines() {
        let store = LibraryStore::new("/nonexistent");
        let walker = ReferenceWalker::new(&store);
        let mut ctx = PackContext::new();
        walker.walk_root("car.ldr", "  \t0 indented  line \n", &mut ctx);

        assert_eq!(ctx.documents()[0].content, "0 indented  line \n");
    }

    #[test]
    fn lowercase_retry_produces_lowercase_canonical_paths() {
        let temp = tempdir().unwrap();
        write(temp.path(), "parts/3001.dat", "0 brick\n");

        let store = LibraryStore::new(temp.path());
        let walker = ReferenceWalker::new(&store);
        let mut ctx = PackContext::new();
        walker.walk_root("car.ldr", &placement("3001.DAT"), &mut ctx);

        assert!(ctx.missing().is_empty());
        assert_eq!(ctx.documents()[0].path, "parts/3001.dat");
    }
}
