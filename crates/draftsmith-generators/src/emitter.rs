//! Shared file emission rules
//!
//! Every built-in generator writes through [`FileEmitter`], which applies the
//! ownership policy, captures backups and writes atomically:
//!
//! - unchanged content is not rewritten and produces no backup
//! - an existing file whose ownership forbids overwriting is kept, and is
//!   still reported with the hash of its on-disk bytes
//! - any other existing file is backed up, then replaced
//! - a path emitted twice into the same output keeps its first backup

use crate::generator::{GeneratorContext, GeneratorError, GeneratorOutput};
use draftsmith_artifact::{ContentHash, GeneratedFileRecord, Ownership, OwnershipPolicy, ProjectRoot};
use draftsmith_state::fs::write_atomic;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What happened to one emitted file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitAction {
    /// File did not exist
    Created,
    /// Existing file replaced; prior content backed up when it was UTF-8
    Overwritten,
    /// Existing file already had these bytes
    Unchanged,
    /// Existing file left alone by ownership
    Kept,
}

/// Result of one emit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    /// Absolute target path
    pub path: PathBuf,
    /// What happened to it
    pub action: EmitAction,
}

/// Writes generator output under a project root
#[derive(Debug, Clone, Copy)]
pub struct FileEmitter<'a> {
    root: &'a ProjectRoot,
    policy: &'a OwnershipPolicy,
    force: bool,
}

impl<'a> FileEmitter<'a> {
    /// Create an emitter
    #[inline]
    #[must_use]
    pub fn new(root: &'a ProjectRoot, policy: &'a OwnershipPolicy, force: bool) -> Self {
        Self {
            root,
            policy,
            force,
        }
    }

    /// Emitter configured from a generator context
    #[inline]
    #[must_use]
    pub fn from_context(ctx: &GeneratorContext<'a>) -> Self {
        Self::new(ctx.root, ctx.policy, ctx.force)
    }

    /// Emit `contents` at `relative` (to the project root), recording the file
    /// into `out`.
    ///
    /// # Errors
    /// [`GeneratorError::Path`] if the path escapes the root, IO errors on read
    /// or write
    pub fn emit(
        &self,
        out: &mut GeneratorOutput,
        relative: impl AsRef<Path>,
        contents: &str,
        default: Ownership,
    ) -> Result<Emitted, GeneratorError> {
        let path = self.root.resolve(relative.as_ref())?;
        let ownership = match self.root.relative(&path) {
            Some(rel) => self.policy.resolve(rel, default),
            None => default,
        };

        let existing = match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(GeneratorError::io_error(&path, e)),
        };

        let (action, hash) = match existing {
            None => {
                self.write(&path, contents)?;
                (EmitAction::Created, ContentHash::compute(contents.as_bytes()))
            }
            Some(bytes) if bytes == contents.as_bytes() => {
                (EmitAction::Unchanged, ContentHash::compute(&bytes))
            }
            Some(bytes) if !ownership.may_overwrite(self.force) => {
                tracing::debug!(path = %path.display(), "keeping user-owned file");
                (EmitAction::Kept, ContentHash::compute(&bytes))
            }
            Some(_) if out.generated.contains_key(&path) => {
                tracing::warn!(path = %path.display(), "path emitted twice in one build");
                out.warn(format!("{} was emitted more than once", path.display()));
                self.write(&path, contents)?;
                (EmitAction::Overwritten, ContentHash::compute(contents.as_bytes()))
            }
            Some(bytes) => {
                match String::from_utf8(bytes) {
                    Ok(prior) => {
                        out.backup.insert(path.clone(), prior);
                    }
                    Err(_) => out.warn(format!(
                        "{} is not UTF-8 and was replaced without a backup",
                        path.display()
                    )),
                }
                self.write(&path, contents)?;
                (EmitAction::Overwritten, ContentHash::compute(contents.as_bytes()))
            }
        };

        tracing::debug!(path = %path.display(), ?action, %ownership, "emitted");
        out.record(GeneratedFileRecord::new(path.clone(), hash, ownership));
        Ok(Emitted { path, action })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), GeneratorError> {
        write_atomic(path, contents.as_bytes()).map_err(|e| GeneratorError::io_error(path, e))
    }
}
