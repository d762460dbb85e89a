//! draftsmith State Store
//!
//! Durable JSON record of what previous builds did, plus the change detector
//! that gates new builds.
//!
//! # Core Concepts
//!
//! - [`BuildState`]: draft hashes, generated-file records, last-build backup
//! - [`StateStore`]: tolerant load, atomic save
//! - [`StateLock`]: exclusive guard for one build or revert
//! - [`ChangeDetector`]: draft hashing and the rebuild decision
//!
//! A corrupt state file is treated as no prior state. Only one builder may
//! hold the lock at a time; a second one gets [`StateError::Locked`].

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod detector;
mod error;
pub mod fs;
mod state;
mod store;

pub use detector::ChangeDetector;
pub use error::StateError;
pub use state::{BuildState, DraftRecord, STATE_VERSION};
pub use store::{StateLock, StateStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
