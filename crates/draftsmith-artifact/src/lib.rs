//! draftsmith Artifact Types
//!
//! Supporting value types shared by every stage of the build pipeline.
//!
//! # Core Concepts
//!
//! - [`ContentHash`]: 32-byte Blake3 digest for drafts and emitted files
//! - [`Ownership`]: whether a generated file may be silently overwritten
//! - [`OwnershipPolicy`]: compiled glob → ownership overrides
//! - [`GeneratedFileRecord`]: path, digest and ownership of one emitted file
//! - [`ProjectRoot`]: root-confined path resolution
//!
//! # Example
//!
//! ```rust
//! use draftsmith_artifact::{ContentHash, GeneratedFileRecord, Ownership};
//!
//! let hash = ContentHash::compute(b"pub struct Post;");
//! let record = GeneratedFileRecord::new("/project/src/models/post.rs", hash, Ownership::ScaffoldOnly);
//! assert_eq!(record.content_hash, hash);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod hash;
mod ownership;
mod path;
mod record;

pub use hash::{ContentHash, HashError};
pub use ownership::{Ownership, OwnershipError, OwnershipPolicy, OwnershipRule};
pub use path::{normalize, PathError, ProjectRoot};
pub use record::GeneratedFileRecord;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
