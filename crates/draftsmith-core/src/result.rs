//! Build inputs and outcomes

use draftsmith_artifact::GeneratedFileRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Parameters of one `build()` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRequest {
    /// Draft file; the configured default when `None`
    pub draft: Option<PathBuf>,
    /// Allow-list of generator names; every generator when `None`
    pub only: Option<Vec<String>>,
    /// Skip the change gate and overwrite scaffold-only files
    pub force: bool,
}

impl BuildRequest {
    /// Build the configured draft with every generator
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With an explicit draft path
    #[inline]
    #[must_use]
    pub fn with_draft(mut self, draft: impl Into<PathBuf>) -> Self {
        self.draft = Some(draft.into());
        self
    }

    /// With a generator allow-list
    #[must_use]
    pub fn with_only<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// With force flag
    #[inline]
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Non-error build outcomes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildOutcome {
    /// Draft unchanged since the last clean build; nothing ran
    NoChanges { draft: PathBuf },
    /// Generators ran
    Built(BuildResult),
}

impl BuildOutcome {
    /// Gate short-circuited?
    #[inline]
    #[must_use]
    pub fn is_no_changes(&self) -> bool {
        matches!(self, Self::NoChanges { .. })
    }

    /// Result when generators ran
    #[inline]
    #[must_use]
    pub fn result(&self) -> Option<&BuildResult> {
        match self {
            Self::Built(result) => Some(result),
            Self::NoChanges { .. } => None,
        }
    }

    /// No generator errors (trivially true for `NoChanges`)
    #[must_use]
    pub fn success(&self) -> bool {
        self.result().map_or(true, |r| r.success)
    }
}

/// Aggregate of one build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildResult {
    /// No generator reported an error
    pub success: bool,
    /// Every file written or kept, by absolute path
    pub generated: BTreeMap<PathBuf, GeneratedFileRecord>,
    /// Generators whose `supports` returned false
    pub skipped: Vec<String>,
    /// Non-fatal notes from all generators
    pub warnings: Vec<String>,
    /// `"<generator>: <message>"` entries
    pub errors: Vec<String>,
}

/// Outcome of `revert()`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevertResult {
    /// Every backed-up file was restored
    pub success: bool,
    /// Files written back
    pub restored: Vec<PathBuf>,
    /// Paths that could not be restored, with the reason
    pub errors: Vec<String>,
}
