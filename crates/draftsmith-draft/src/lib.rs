//! draftsmith Draft Layer
//!
//! The boundary between the human-edited draft file and the typed
//! [`Specification`] every generator consumes.
//!
//! # Pipeline
//!
//! ```text
//! draft text → YAML → Normalizer → Validator → Specification
//! ```
//!
//! # Core Concepts
//!
//! - [`Specification`]: immutable parsed draft (entities, actions, pages, routes)
//! - [`normalize_entities`]: shorthand expansion, pure and infallible
//! - [`validate`]: itemized structural checks, empty list means valid
//! - [`DraftParser`]: the single parse entry point
//!
//! # Example
//!
//! ```rust
//! use draftsmith_draft::parse;
//!
//! let spec = parse("models:\n  Post:\n    title: string:255\n    relationships:\n      belongsTo: User\n")?;
//! let post = spec.entity("Post").unwrap();
//! assert!(post.fields.contains_key("user_id"));
//! # Ok::<(), draftsmith_draft::ParseError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod inflect;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod validate;

pub use error::ParseError;
pub use model::{
    ActionDef, ActionParam, ActionReturn, EntityDef, FieldDef, ForeignKeyRef, RelationKind,
    RelationTarget, SeederCategory, SeederDef, Specification, RESERVED_KEYS,
};
pub use normalize::normalize_entities;
pub use parser::{parse, DraftParser};
pub use validate::validate;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
