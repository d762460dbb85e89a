//! Restoring files from the last build's backup

use crate::result::RevertResult;
use draftsmith_artifact::{ContentHash, ProjectRoot};
use draftsmith_state::fs::write_atomic;
use draftsmith_state::BuildState;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Write every backed-up file back. Paths outside `root` are refused and
/// reported; the rest are still attempted. Restored files get their recorded
/// hash updated in `state`.
pub(crate) fn restore(
    root: &ProjectRoot,
    backup: BTreeMap<PathBuf, String>,
    state: &mut BuildState,
) -> RevertResult {
    let mut result = RevertResult::default();

    for (path, content) in backup {
        let target = match root.resolve(&path) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(path = %path.display(), "refusing to restore outside the project root");
                result.errors.push(e.to_string());
                continue;
            }
        };

        match write_atomic(&target, content.as_bytes()) {
            Ok(()) => {
                tracing::debug!(path = %target.display(), "restored");
                if let Some(record) = state.generated.get_mut(&target) {
                    record.content_hash = ContentHash::compute(content.as_bytes());
                }
                result.restored.push(target);
            }
            Err(e) => result
                .errors
                .push(format!("failed to restore {}: {e}", target.display())),
        }
    }

    result.success = result.errors.is_empty();
    result
}
