//! Metadata recorded for every file a generator emits

use crate::hash::ContentHash;
use crate::ownership::Ownership;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What the pipeline knows about one generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedFileRecord {
    /// Absolute path of the emitted file
    pub path: PathBuf,
    /// Digest of the bytes on disk after the build
    pub content_hash: ContentHash,
    /// Overwrite policy the file was emitted under
    pub ownership: Ownership,
    /// Logical table, set only by table-owning generators
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl GeneratedFileRecord {
    /// Create a record for emitted content
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, content_hash: ContentHash, ownership: Ownership) -> Self {
        Self {
            path: path.into(),
            content_hash,
            ownership,
            table: None,
        }
    }

    /// Tag the record with the logical table it owns
    #[inline]
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Does this record own the given table?
    #[inline]
    #[must_use]
    pub fn owns_table(&self, table: &str) -> bool {
        self.table.as_deref() == Some(table)
    }

    /// Path accessor
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
