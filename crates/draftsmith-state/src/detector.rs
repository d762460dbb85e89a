//! Change detection for draft files

use crate::error::StateError;
use crate::state::BuildState;
use draftsmith_artifact::ContentHash;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Decides whether a draft needs rebuilding
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeDetector;

impl ChangeDetector {
    /// Create new change detector
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Digest of the raw draft bytes; an absent file hashes as empty
    ///
    /// # Errors
    /// IO errors other than "not found"
    pub fn compute_hash(&self, draft: &Path) -> Result<ContentHash, StateError> {
        match fs::read(draft) {
            Ok(bytes) => Ok(self.hash_bytes(&bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ContentHash::empty()),
            Err(e) => Err(StateError::io_error(draft, e)),
        }
    }

    /// Digest of draft bytes already in memory
    #[inline]
    #[must_use]
    pub fn hash_bytes(&self, bytes: &[u8]) -> ContentHash {
        ContentHash::compute(bytes)
    }

    /// True when no digest is recorded for `draft` or it differs from `hash`
    #[must_use]
    pub fn has_changed(&self, state: &BuildState, draft: &Path, hash: &ContentHash) -> bool {
        state.draft(draft).map_or(true, |record| record.hash != *hash)
    }
}
