//! draftsmith Core
//!
//! The build orchestrator: turns one draft file into generated sources while
//! keeping the state store consistent across repeated runs.
//!
//! # Core Concepts
//!
//! - [`BuildOrchestrator`]: `plan`, `build`, `revert` and `status`
//! - [`BuildConfig`]: project root, draft and state paths, ownership rules
//! - [`plan`]: dry-run steps in generator registration order
//! - [`BuildOutcome`] / [`BuildResult`]: what a build did
//! - [`BuildError`]: fail-fast terminal states
//!
//! # Example
//!
//! ```rust,no_run
//! use draftsmith_core::{BuildConfig, BuildOrchestrator, BuildRequest};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = BuildOrchestrator::with_defaults(BuildConfig::load(".")?)?;
//! let outcome = orchestrator.build(&BuildRequest::new())?;
//! if let Some(result) = outcome.result() {
//!     for error in &result.errors {
//!         eprintln!("{error}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod orchestrator;
mod planner;
mod result;
mod revert;

pub use config::{BuildConfig, ConfigError, CONFIG_FILE, DEFAULT_DRAFT, DEFAULT_STATE};
pub use error::BuildError;
pub use orchestrator::BuildOrchestrator;
pub use planner::{plan, PlanStep, StepKind};
pub use result::{BuildOutcome, BuildRequest, BuildResult, RevertResult};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
