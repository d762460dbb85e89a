//! Generator contract
//!
//! Provides the [`Generator`] trait every output kind implements, the
//! read-only [`GeneratorContext`] it runs against and the [`GeneratorOutput`]
//! it reports back.

use chrono::{DateTime, Utc};
use draftsmith_artifact::{GeneratedFileRecord, OwnershipPolicy, PathError, ProjectRoot};
use draftsmith_draft::Specification;
use draftsmith_state::BuildState;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One kind of build output
///
/// # Contract
/// - `supports` is cheap and side-effect free.
/// - `generate` performs every filesystem write for its output kind and is
///   idempotent: same specification and same filesystem in, same bytes and
///   same `generated` map out.
/// - Existing files are backed up into [`GeneratorOutput::backup`] before
///   they are replaced.
pub trait Generator: Send + Sync + std::fmt::Debug {
    /// Registry name, also the prefix of any error it reports
    fn name(&self) -> &str;

    /// Does this generator have anything to do for `spec`?
    fn supports(&self, spec: &Specification) -> bool;

    /// Emit files for `ctx.spec`
    ///
    /// # Errors
    /// Any failure that should be reported as `"<name>: <message>"`
    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError>;
}

/// Everything a generator may read during one build
#[derive(Debug, Clone, Copy)]
pub struct GeneratorContext<'a> {
    /// Parsed draft
    pub spec: &'a Specification,
    /// Draft file being built
    pub draft_path: &'a Path,
    /// Every output path must resolve under this root
    pub root: &'a ProjectRoot,
    /// State as loaded before the build
    pub state: &'a BuildState,
    /// Decides whether existing files may be replaced
    pub policy: &'a OwnershipPolicy,
    /// Overwrite scaffold files too
    pub force: bool,
    /// Build start, used for minted timestamped paths
    pub started_at: DateTime<Utc>,
}

impl<'a> GeneratorContext<'a> {
    /// Create a context with an empty policy, no force, started now
    #[must_use]
    pub fn new(
        spec: &'a Specification,
        draft_path: &'a Path,
        root: &'a ProjectRoot,
        state: &'a BuildState,
        policy: &'a OwnershipPolicy,
    ) -> Self {
        Self {
            spec,
            draft_path,
            root,
            state,
            policy,
            force: false,
            started_at: Utc::now(),
        }
    }

    /// Set force flag
    #[inline]
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Set build start time
    #[inline]
    #[must_use]
    pub fn with_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.started_at = at;
        self
    }

    /// File name of the draft, for generated-file headers
    #[must_use]
    pub fn draft_name(&self) -> String {
        self.draft_path
            .file_name()
            .map_or_else(|| "draft".to_string(), |n| n.to_string_lossy().into_owned())
    }
}

/// What one generator (or a whole build) produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorOutput {
    /// Files written or kept, by absolute path
    pub generated: BTreeMap<PathBuf, GeneratedFileRecord>,
    /// Non-fatal notes
    pub warnings: Vec<String>,
    /// `"<generator>: <message>"` entries
    pub errors: Vec<String>,
    /// Prior UTF-8 content of every file this run replaced
    pub backup: BTreeMap<PathBuf, String>,
}

impl GeneratorOutput {
    /// Create empty output
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an emitted file; a later record for the same path wins
    pub fn record(&mut self, record: GeneratedFileRecord) {
        self.generated.insert(record.path.clone(), record);
    }

    /// Add a warning
    #[inline]
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Tag an already recorded file with the logical table it owns
    pub fn tag_table(&mut self, path: &Path, table: &str) {
        if let Some(record) = self.generated.get_mut(path) {
            record.table = Some(table.to_string());
        }
    }

    /// Union another output into this one. Records from `other` win on path
    /// collisions; warnings and errors are appended. A backup is only taken
    /// from `other` for paths this output has not touched yet, so it always
    /// holds the content from before the build.
    pub fn merge(&mut self, other: Self) {
        for (path, prior) in other.backup {
            if !self.generated.contains_key(&path) {
                self.backup.entry(path).or_insert(prior);
            }
        }
        self.generated.extend(other.generated);
        self.warnings.extend(other.warnings);
        self.errors.extend(other.errors);
    }

    /// No errors recorded?
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Generator failure
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Output path escapes the project root
    #[error(transparent)]
    Path(#[from] PathError),

    /// IO error on an output path
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Rendering failed
    #[error("render failed: {0}")]
    Render(String),

    /// Generator-specific failure
    #[error("{0}")]
    Failed(String),
}

impl GeneratorError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create generator-specific failure
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftsmith_artifact::{ContentHash, Ownership};

    fn rec(path: &str, body: &[u8]) -> GeneratedFileRecord {
        GeneratedFileRecord::new(path, ContentHash::compute(body), Ownership::Regenerate)
    }

    #[test]
    fn merge_is_last_write_wins() {
        let mut first = GeneratorOutput::new();
        first.record(rec("/p/a", b"one"));
        first.warn("first");

        let mut second = GeneratorOutput::new();
        second.record(rec("/p/a", b"two"));
        second.errors.push("x: broke".into());

        first.merge(second);
        assert_eq!(first.generated.len(), 1);
        assert_eq!(
            first.generated[Path::new("/p/a")].content_hash,
            ContentHash::compute(b"two")
        );
        assert_eq!(first.warnings, vec!["first"]);
        assert!(!first.is_clean());
    }

    #[test]
    fn merge_keeps_pre_build_backups() {
        let mut first = GeneratorOutput::new();
        first.record(rec("/p/created", b"one"));
        first.record(rec("/p/replaced", b"one"));
        first.backup.insert("/p/replaced".into(), "original".into());

        let mut second = GeneratorOutput::new();
        second.record(rec("/p/created", b"two"));
        second.record(rec("/p/replaced", b"two"));
        second.record(rec("/p/other", b"two"));
        second.backup.insert("/p/created".into(), "one".into());
        second.backup.insert("/p/replaced".into(), "one".into());
        second.backup.insert("/p/other".into(), "theirs".into());

        first.merge(second);
        assert_eq!(first.backup.len(), 2);
        assert_eq!(first.backup[Path::new("/p/replaced")], "original");
        assert_eq!(first.backup[Path::new("/p/other")], "theirs");
        assert!(!first.backup.contains_key(Path::new("/p/created")));
    }

    #[test]
    fn tag_table_only_touches_recorded_paths() {
        let mut out = GeneratorOutput::new();
        out.record(rec("/p/m.sql", b"sql"));
        out.tag_table(Path::new("/p/m.sql"), "posts");
        out.tag_table(Path::new("/p/other.sql"), "users");

        assert!(out.generated[Path::new("/p/m.sql")].owns_table("posts"));
        assert_eq!(out.generated.len(), 1);
    }
}
