//! Error types for the build orchestrator
//!
//! Only fail-fast terminal states are errors. Generator failures are itemized
//! inside [`BuildResult`](crate::BuildResult) instead.

use draftsmith_state::StateError;
use std::path::PathBuf;

/// Terminal build failure; nothing was generated and state is untouched
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Draft path does not resolve to an existing file
    #[error("draft not found: {}", path.display())]
    MissingDraft { path: PathBuf },

    /// Draft text is unparsable or fails validation
    #[error("invalid draft {}: {}", path.display(), errors.join("; "))]
    InvalidDraft { path: PathBuf, errors: Vec<String> },

    /// Another build or revert holds the state lock
    #[error("another build is running (lock file {})", lock.display())]
    StateLocked { lock: PathBuf },

    /// State store failure
    #[error("state error: {0}")]
    State(StateError),

    /// Draft exists but could not be read
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    /// Every itemized problem behind this error
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        match self {
            Self::InvalidDraft { errors, .. } => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<StateError> for BuildError {
    fn from(err: StateError) -> Self {
        match err {
            StateError::Locked { lock } => Self::StateLocked { lock },
            other => Self::State(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_contention_maps_to_state_locked() {
        let err: BuildError = StateError::Locked {
            lock: "/p/state.json.lock".into(),
        }
        .into();
        assert!(matches!(err, BuildError::StateLocked { .. }));
    }

    #[test]
    fn invalid_draft_lists_every_error() {
        let err = BuildError::InvalidDraft {
            path: "/p/draft.yaml".into(),
            errors: vec!["a".into(), "b".into()],
        };
        assert_eq!(err.errors(), vec!["a", "b"]);
        assert_eq!(err.to_string(), "invalid draft /p/draft.yaml: a; b");
    }
}
