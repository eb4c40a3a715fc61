//! # mpdpack Packer
//!
//! Resolves a reference-based model file into one self-contained
//! multi-document artifact.
//!
//! ## Pipeline
//!
//! ```text
//! Root file
//!     │
//!     ├──> Reference Graph Walker (recursive, line-driven)
//!     │      ├─ Line classifier {self-declaration, placement, other}
//!     │      ├─ Path Resolver (per unresolved name)
//!     │      └─ Post-order document sequence
//!     │
//!     └──> Packer
//!            ├─ Materials preamble (mandatory)
//!            ├─ Documents in reverse append order (root first)
//!            └─ Aggregated missing-reference failure
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use mpdpack_library::LibraryStore;
//! use mpdpack_packer::Packer;
//!
//! fn main() -> mpdpack_packer::Result<()> {
//!     let store = LibraryStore::new("/var/lib/ldraw");
//!     let packed = Packer::new(&store).pack("car", "1 16 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat\n")?;
//!     println!("{}: {} bytes", packed.file_name, packed.content.len());
//!     Ok(())
//! }
//! ```

mod error;
mod line;
mod packer;
mod walker;

pub use error::{PackError, Result};
pub use line::{classify, strip_indent, LineKind};
pub use packer::{PackedModel, Packer};
pub use walker::{Document, PackContext, ReferenceWalker};
