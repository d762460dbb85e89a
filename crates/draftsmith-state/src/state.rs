//! Persisted build state
//!
//! The only value with a lifetime across builds. JSON layout:
//!
//! ```json
//! {
//!   "version": 1,
//!   "lastRun": "2026-01-01T00:00:00Z",
//!   "drafts": { "/project/draft.yaml": { "hash": "…", "lastBuilt": "…" } },
//!   "generated": { "/project/src/models/post.rs": { "path": "…", "contentHash": "…", "ownership": "scaffold_only" } },
//!   "last_build_backup": { "/project/routes.rs": "previous content" }
//! }
//! ```

use chrono::{DateTime, Utc};
use draftsmith_artifact::{ContentHash, GeneratedFileRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current state file format version
pub const STATE_VERSION: u32 = 1;

/// Last build of one draft file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    /// Hash of the draft bytes that were built
    pub hash: ContentHash,
    /// When that build finished
    pub last_built: DateTime<Utc>,
}

/// Everything recorded between builds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildState {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,

    #[serde(default)]
    pub drafts: BTreeMap<PathBuf, DraftRecord>,

    #[serde(default)]
    pub generated: BTreeMap<PathBuf, GeneratedFileRecord>,

    /// Pre-overwrite content captured by the last successful build
    #[serde(
        rename = "last_build_backup",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub last_build_backup: BTreeMap<PathBuf, String>,
}

fn default_version() -> u32 {
    STATE_VERSION
}

impl Default for BuildState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            last_run: None,
            drafts: BTreeMap::new(),
            generated: BTreeMap::new(),
            last_build_backup: BTreeMap::new(),
        }
    }
}

impl BuildState {
    /// Recorded build of a draft path
    #[inline]
    #[must_use]
    pub fn draft(&self, path: &Path) -> Option<&DraftRecord> {
        self.drafts.get(path)
    }

    /// Generated file that owns a logical table, if any
    #[must_use]
    pub fn record_for_table(&self, table: &str) -> Option<&GeneratedFileRecord> {
        self.generated.values().find(|record| record.owns_table(table))
    }

    /// Is there a backup a revert could restore?
    #[inline]
    #[must_use]
    pub fn has_backup(&self) -> bool {
        !self.last_build_backup.is_empty()
    }

    /// Record a clean build of `draft`.
    ///
    /// Generated records are merged (later entries win) and the backup map is
    /// replaced wholesale.
    pub fn record_build(
        &mut self,
        draft: impl Into<PathBuf>,
        hash: ContentHash,
        generated: BTreeMap<PathBuf, GeneratedFileRecord>,
        backup: BTreeMap<PathBuf, String>,
        at: DateTime<Utc>,
    ) {
        self.last_run = Some(at);
        self.drafts.insert(
            draft.into(),
            DraftRecord {
                hash,
                last_built: at,
            },
        );
        self.generated.extend(generated);
        self.last_build_backup = backup;
    }

    /// Drop the backup, returning what it held
    pub fn take_backup(&mut self) -> BTreeMap<PathBuf, String> {
        std::mem::take(&mut self.last_build_backup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftsmith_artifact::Ownership;
    use pretty_assertions::assert_eq;

    fn record(path: &str, table: Option<&str>) -> GeneratedFileRecord {
        let r = GeneratedFileRecord::new(path, ContentHash::compute(path.as_bytes()), Ownership::Regenerate);
        match table {
            Some(t) => r.with_table(t),
            None => r,
        }
    }

    #[test]
    fn json_uses_documented_keys() {
        let mut state = BuildState::default();
        let mut generated = BTreeMap::new();
        generated.insert(PathBuf::from("/p/a.rs"), record("/p/a.rs", None));
        let mut backup = BTreeMap::new();
        backup.insert(PathBuf::from("/p/a.rs"), "old".to_string());
        state.record_build("/p/draft.yaml", ContentHash::empty(), generated, backup, Utc::now());

        let json: serde_json::Value = serde_json::to_value(&state).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["drafts", "generated", "lastRun", "last_build_backup", "version"]);
        assert!(json["drafts"]["/p/draft.yaml"]["lastBuilt"].is_string());
        assert!(json["generated"]["/p/a.rs"]["contentHash"].is_string());
    }

    #[test]
    fn empty_backup_is_omitted_and_defaults_fill_in() {
        let json = serde_json::to_string(&BuildState::default()).unwrap();
        assert!(!json.contains("last_build_backup"));

        let parsed: BuildState = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, BuildState::default());
    }

    #[test]
    fn record_for_table_finds_owner() {
        let mut state = BuildState::default();
        state.generated.insert("/p/m1.sql".into(), record("/p/m1.sql", Some("posts")));
        state.generated.insert("/p/post.rs".into(), record("/p/post.rs", None));

        assert_eq!(
            state.record_for_table("posts").map(GeneratedFileRecord::path),
            Some(Path::new("/p/m1.sql"))
        );
        assert!(state.record_for_table("users").is_none());
    }

    #[test]
    fn record_build_replaces_backup() {
        let mut state = BuildState::default();
        let mut first = BTreeMap::new();
        first.insert(PathBuf::from("/p/a"), "a".to_string());
        state.record_build("/p/d.yaml", ContentHash::empty(), BTreeMap::new(), first, Utc::now());
        assert!(state.has_backup());

        state.record_build("/p/d.yaml", ContentHash::empty(), BTreeMap::new(), BTreeMap::new(), Utc::now());
        assert!(!state.has_backup());
        assert_eq!(state.take_backup().len(), 0);
    }
}
