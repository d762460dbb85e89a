//! draftsmith Generators
//!
//! The pluggable half of the build: every output kind is a [`Generator`]
//! that turns a [`Specification`](draftsmith_draft::Specification) into files.
//!
//! # Core Concepts
//!
//! - [`Generator`]: `supports` + `generate` contract
//! - [`GeneratorContext`]: read-only view of one build (spec, root, state, policy)
//! - [`GeneratorOutput`]: generated records, warnings, errors and backups
//! - [`FileEmitter`]: shared ownership-aware, atomic file writes
//! - [`GeneratorRegistry`]: ordered, name-keyed generator list
//!
//! # Example
//!
//! ```rust
//! use draftsmith_generators::GeneratorRegistry;
//!
//! let registry = GeneratorRegistry::with_defaults();
//! assert_eq!(registry.names()[0], "model");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod builtin;
mod emitter;
mod generator;
mod registry;

pub use builtin::{
    ActionGenerator, MigrationGenerator, ModelGenerator, PageGenerator, RouteGenerator,
    SeederGenerator, TestGenerator, TypesGenerator,
};
pub use emitter::{EmitAction, Emitted, FileEmitter};
pub use generator::{Generator, GeneratorContext, GeneratorError, GeneratorOutput};
pub use registry::GeneratorRegistry;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
