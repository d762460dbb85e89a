//! Build orchestrator
//!
//! One `build()` call runs: resolve → lock → load → parse → gate → select →
//! run → aggregate → finalize. The draft is read once under the lock; the
//! bytes that are parsed are the bytes whose hash gets recorded. Parse and
//! gate failures leave no side effects.
//! Generators run best-effort in registration order; state is persisted only
//! when none of them reported an error.
//!
//! Files written by generators before a later generator fails stay on disk,
//! while state keeps describing the previous clean build. Re-running the build
//! converges again.

use crate::config::{BuildConfig, ConfigError};
use crate::error::BuildError;
use crate::planner::{self, PlanStep};
use crate::result::{BuildOutcome, BuildRequest, BuildResult, RevertResult};
use crate::revert;
use chrono::Utc;
use draftsmith_artifact::{ContentHash, OwnershipPolicy, ProjectRoot};
use draftsmith_draft::{DraftParser, Specification};
use draftsmith_generators::{Generator, GeneratorContext, GeneratorOutput, GeneratorRegistry};
use draftsmith_state::{BuildState, ChangeDetector, StateError, StateStore};
use std::any::Any;
use std::fs;
use std::io::ErrorKind;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Runs generators against a draft and keeps the state store current
#[derive(Debug)]
pub struct BuildOrchestrator {
    config: BuildConfig,
    root: ProjectRoot,
    policy: OwnershipPolicy,
    registry: GeneratorRegistry,
    store: StateStore,
    parser: DraftParser,
    detector: ChangeDetector,
}

impl BuildOrchestrator {
    /// Create an orchestrator over an injected generator registry
    ///
    /// # Errors
    /// Invalid ownership globs, or a relative root when the working directory
    /// cannot be determined
    pub fn new(config: BuildConfig, registry: GeneratorRegistry) -> Result<Self, ConfigError> {
        let mut config = config;
        if config.project_root.is_relative() {
            let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
                path: config.project_root.clone(),
                source,
            })?;
            config.project_root = cwd.join(&config.project_root);
        }
        let root = ProjectRoot::new(&config.project_root);
        let policy = config.policy()?;
        let store = StateStore::new(root.join(&config.state_path));

        Ok(Self {
            config,
            root,
            policy,
            registry,
            store,
            parser: DraftParser::new(),
            detector: ChangeDetector::new(),
        })
    }

    /// Create an orchestrator with the built-in generators
    ///
    /// # Errors
    /// See [`BuildOrchestrator::new`]
    pub fn with_defaults(config: BuildConfig) -> Result<Self, ConfigError> {
        Self::new(config, GeneratorRegistry::with_defaults())
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Generator registry
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// State store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Project root
    #[inline]
    #[must_use]
    pub fn root(&self) -> &ProjectRoot {
        &self.root
    }

    /// Steps a build of `spec` would take
    #[must_use]
    pub fn plan(&self, spec: &Specification) -> Vec<PlanStep> {
        planner::plan(spec)
    }

    /// Load and parse a draft, then plan it
    ///
    /// # Errors
    /// [`BuildError::MissingDraft`] or [`BuildError::InvalidDraft`]
    pub fn plan_draft(&self, draft: Option<&Path>) -> Result<Vec<PlanStep>, BuildError> {
        let draft = self.resolve_draft(draft);
        let (spec, _) = self.read_draft(&draft)?;
        Ok(self.plan(&spec))
    }

    /// Run a build
    ///
    /// # Errors
    /// Fail-fast terminal states only: missing or invalid draft, lock
    /// contention and state IO. Generator failures are reported in the
    /// returned [`BuildResult`].
    pub fn build(&self, request: &BuildRequest) -> Result<BuildOutcome, BuildError> {
        let draft = self.resolve_draft(request.draft.as_deref());
        tracing::info!(draft = %draft.display(), force = request.force, "build started");

        if !draft.is_file() {
            return Err(BuildError::MissingDraft { path: draft });
        }

        let _lock = self.store.lock()?;
        let (spec, hash) = self.read_draft(&draft)?;
        let mut state = self.store.load()?;

        if !request.force && !self.detector.has_changed(&state, &draft, &hash) {
            tracing::info!(draft = %draft.display(), "draft unchanged, nothing to build");
            return Ok(BuildOutcome::NoChanges { draft });
        }

        let ctx = GeneratorContext::new(&spec, &draft, &self.root, &state, &self.policy)
            .with_force(request.force)
            .with_started_at(Utc::now());

        let mut aggregate = GeneratorOutput::new();
        let mut skipped = Vec::new();
        for generator in self.registry.select(request.only.as_deref()) {
            let name = generator.name();
            if !generator.supports(&spec) {
                tracing::debug!(generator = name, "skipped");
                skipped.push(name.to_string());
                continue;
            }
            tracing::debug!(generator = name, "running");
            match run_generator(generator, &ctx) {
                Ok(output) => aggregate.merge(output),
                Err(message) => {
                    tracing::warn!(generator = name, error = %message, "generator failed");
                    aggregate.errors.push(format!("{name}: {message}"));
                }
            }
        }

        let success = aggregate.is_clean();
        if success {
            state.record_build(
                &draft,
                hash,
                aggregate.generated.clone(),
                aggregate.backup,
                Utc::now(),
            );
            self.store.save(&state)?;
        } else {
            tracing::warn!(
                errors = aggregate.errors.len(),
                "build failed, state not updated; files already written stay on disk"
            );
        }

        tracing::info!(
            success,
            generated = aggregate.generated.len(),
            skipped = skipped.len(),
            warnings = aggregate.warnings.len(),
            "build finished"
        );
        Ok(BuildOutcome::Built(BuildResult {
            success,
            generated: aggregate.generated,
            skipped,
            warnings: aggregate.warnings,
            errors: aggregate.errors,
        }))
    }

    /// Restore every file the last clean build overwrote, then clear the
    /// backup. A second call is a no-op.
    ///
    /// # Errors
    /// Lock contention or state IO; per-path failures are itemized in the
    /// result instead
    pub fn revert(&self) -> Result<RevertResult, StateError> {
        let _lock = self.store.lock()?;
        let mut state = self.store.load()?;
        if !state.has_backup() {
            tracing::info!("nothing to revert");
            return Ok(RevertResult {
                success: true,
                ..RevertResult::default()
            });
        }

        let backup = state.take_backup();
        tracing::info!(files = backup.len(), "reverting last build");
        let result = revert::restore(&self.root, backup, &mut state);
        self.store.save(&state)?;
        Ok(result)
    }

    /// Current persisted state
    ///
    /// # Errors
    /// State IO other than a missing or corrupt file
    pub fn status(&self) -> Result<BuildState, StateError> {
        self.store.load()
    }

    fn resolve_draft(&self, draft: Option<&Path>) -> PathBuf {
        match draft {
            Some(path) => self.root.join(path),
            None => self.root.join(&self.config.draft_path),
        }
    }

    // Parse and hash from a single read of the draft
    fn read_draft(&self, draft: &Path) -> Result<(Specification, ContentHash), BuildError> {
        let missing = || BuildError::MissingDraft {
            path: draft.to_path_buf(),
        };
        if !draft.is_file() {
            return Err(missing());
        }
        let bytes = match fs::read(draft) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(missing()),
            Err(source) => {
                return Err(BuildError::Io {
                    path: draft.to_path_buf(),
                    source,
                })
            }
        };
        let hash = self.detector.hash_bytes(&bytes);
        let invalid = |errors: Vec<String>| BuildError::InvalidDraft {
            path: draft.to_path_buf(),
            errors,
        };

        let text = String::from_utf8(bytes)
            .map_err(|_| invalid(vec!["draft is not valid UTF-8".to_string()]))?;
        let spec = self.parser.parse(&text).map_err(|err| {
            tracing::debug!(error = %err, "draft rejected");
            invalid(err.errors())
        })?;
        Ok((spec, hash))
    }
}

// Errors and panics both become a message; siblings keep running.
fn run_generator(generator: &dyn Generator, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, String> {
    match catch_unwind(AssertUnwindSafe(|| generator.generate(ctx))) {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(err)) => Err(err.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_messages_are_extracted() {
        let payload = catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "panicked: boom");

        let payload = catch_unwind(|| panic!("code {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "panicked: code 7");
    }

    #[test]
    fn relative_root_is_made_absolute() {
        let orchestrator = BuildOrchestrator::with_defaults(BuildConfig::new("project")).unwrap();
        assert!(orchestrator.root().as_path().is_absolute());
        assert!(orchestrator.store().path().ends_with(".draftsmith/state.json"));
    }
}
