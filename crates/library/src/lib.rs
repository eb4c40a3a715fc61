//! # mpdpack Library
//!
//! Read-only access to an LDraw parts library, plus the one-time
//! provisioning step that puts it on disk.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//!     LDConfig.ldr     materials definitions (mandatory)
//!     parts/           parts
//!     p/               primitives
//!     models/          models
//! ```
//!
//! Reference names are located by probing each conventional location
//! in priority order, with a lowercased retry when the original
//! spelling fails everywhere. See [`PathResolver`].

mod error;
mod provision;
mod resolver;
mod store;

pub use error::{LibraryError, Result};
pub use provision::{ensure_provisioned, Provision, DEFAULT_LIBRARY_URL};
pub use resolver::{normalize_name, PathResolver, Resolved};
pub use store::{LibraryStatus, LibraryStore, MATERIALS_FILE, SEARCH_PREFIXES};
