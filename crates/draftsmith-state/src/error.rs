//! Error types for the state store

use std::path::PathBuf;

/// Errors reading, writing or locking build state
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// Another builder holds the state lock
    #[error("state is locked by another build (lock file {})", lock.display())]
    Locked { lock: PathBuf },

    /// IO error on a state or draft path
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// State could not be encoded
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StateError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Is this lock contention?
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}
