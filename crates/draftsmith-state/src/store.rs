//! JSON state store with an exclusive lock file

use crate::error::StateError;
use crate::fs::write_atomic;
use crate::state::BuildState;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Reads and writes [`BuildState`] at a fixed path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Create a store for the given state file
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// State file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lock file guarding read-modify-write cycles
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Load state. A missing file yields defaults; so does an unreadable JSON
    /// document, with a warning.
    ///
    /// # Errors
    /// IO errors other than "not found"
    pub fn load(&self) -> Result<BuildState, StateError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BuildState::default()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!(path = %self.path.display(), "state file is not UTF-8, starting fresh");
                return Ok(BuildState::default());
            }
            Err(e) => return Err(StateError::io_error(&self.path, e)),
        };

        match serde_json::from_str(&text) {
            Ok(state) => Ok(state),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "corrupt state file, starting fresh");
                Ok(BuildState::default())
            }
        }
    }

    /// Persist state atomically
    ///
    /// # Errors
    /// Encoding or IO failure
    pub fn save(&self, state: &BuildState) -> Result<(), StateError> {
        let mut json = serde_json::to_vec_pretty(state)?;
        json.push(b'\n');
        write_atomic(&self.path, &json).map_err(|e| StateError::io_error(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), files = state.generated.len(), "state saved");
        Ok(())
    }

    /// Take the exclusive builder lock
    ///
    /// # Errors
    /// [`StateError::Locked`] when another holder exists, IO errors otherwise
    pub fn lock(&self) -> Result<StateLock, StateError> {
        let lock = self.lock_path();
        if let Some(parent) = lock.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StateError::io_error(parent, e))?;
        }
        match OpenOptions::new().write(true).create_new(true).open(&lock) {
            Ok(mut file) => {
                // Holder pid, for humans inspecting a stale lock
                let _ = writeln!(file, "{}", std::process::id());
                tracing::debug!(lock = %lock.display(), "state lock acquired");
                Ok(StateLock { path: lock })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StateError::Locked { lock }),
            Err(e) => Err(StateError::io_error(&lock, e)),
        }
    }
}

/// Held for the duration of one build or revert; releases on drop
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct StateLock {
    path: PathBuf,
}

impl StateLock {
    /// Lock file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release state lock");
        }
    }
}
