//! Testing utilities for the draftsmith workspace
//!
//! Temporary projects, sample drafts and misbehaving generators.

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use draftsmith_artifact::Ownership;
use draftsmith_core::{BuildConfig, BuildOrchestrator};
use draftsmith_draft::Specification;
use draftsmith_generators::{
    FileEmitter, Generator, GeneratorContext, GeneratorError, GeneratorOutput, GeneratorRegistry,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Post belongs to User; User is never declared
pub const POST_BELONGS_TO_USER: &str = "\
models:
  Post:
    title: string:255
    content: longtext
    relationships:
      belongsTo: User
";

/// Two entities, an action and a page
pub const BLOG: &str = "\
models:
  User:
    name: string
    email: string unique
  Post:
    title: string:255
    published_at: timestamp nullable
    relationships:
      belongsTo: User
    seeder:
      category: demo
      count: 10
actions:
  PublishPost:
    model: Post
    params: [post_id]
    return: Post
pages:
  dashboard:
    layout: wide
";

/// Project in a temporary directory, removed on drop
#[derive(Debug)]
pub struct TempProject {
    dir: tempfile::TempDir,
}

impl TempProject {
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Project with `draft.yaml` already written
    #[must_use]
    pub fn with_draft(draft: &str) -> Self {
        let project = Self::new();
        project.write_draft(draft);
        project
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    #[must_use]
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root().join(relative)
    }

    pub fn write_draft(&self, draft: &str) {
        self.write("draft.yaml", draft);
    }

    pub fn write(&self, relative: impl AsRef<Path>, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(path, contents).expect("write file");
    }

    #[must_use]
    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        fs::read_to_string(self.path(relative)).expect("read file")
    }

    #[must_use]
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }

    /// Files under `relative`, sorted, as paths relative to it
    #[must_use]
    pub fn list(&self, relative: impl AsRef<Path>) -> Vec<String> {
        let dir = self.path(relative);
        let mut names: Vec<String> = match fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    #[must_use]
    pub fn config(&self) -> BuildConfig {
        BuildConfig::new(self.root())
    }

    /// Orchestrator with the built-in generators
    #[must_use]
    pub fn orchestrator(&self) -> BuildOrchestrator {
        BuildOrchestrator::with_defaults(self.config()).expect("default config is valid")
    }

    /// Orchestrator over a custom registry
    #[must_use]
    pub fn orchestrator_with(&self, registry: GeneratorRegistry) -> BuildOrchestrator {
        BuildOrchestrator::new(self.config(), registry).expect("default config is valid")
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Always returns an error
#[derive(Debug, Clone)]
pub struct FailingGenerator {
    pub name: &'static str,
    pub message: &'static str,
}

impl FailingGenerator {
    #[must_use]
    pub fn new(name: &'static str, message: &'static str) -> Self {
        Self { name, message }
    }
}

impl Generator for FailingGenerator {
    fn name(&self) -> &str {
        self.name
    }

    fn supports(&self, _spec: &Specification) -> bool {
        true
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        Err(GeneratorError::failed(self.message))
    }
}

/// Always panics
#[derive(Debug, Clone)]
pub struct PanickingGenerator {
    pub name: &'static str,
}

impl Generator for PanickingGenerator {
    fn name(&self) -> &str {
        self.name
    }

    fn supports(&self, _spec: &Specification) -> bool {
        true
    }

    fn generate(&self, _ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        panic!("{} exploded", self.name)
    }
}

/// Writes one fixed file and counts its invocations
#[derive(Debug, Clone)]
pub struct RecordingGenerator {
    pub name: &'static str,
    pub path: &'static str,
    pub contents: &'static str,
    pub ownership: Ownership,
    calls: Arc<AtomicUsize>,
}

impl RecordingGenerator {
    #[must_use]
    pub fn new(name: &'static str, path: &'static str, contents: &'static str) -> Self {
        Self {
            name,
            path,
            contents,
            ownership: Ownership::Regenerate,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[must_use]
    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Shared invocation counter; clones observe the same count
    #[must_use]
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Generator for RecordingGenerator {
    fn name(&self) -> &str {
        self.name
    }

    fn supports(&self, _spec: &Specification) -> bool {
        true
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut out = GeneratorOutput::new();
        FileEmitter::from_context(ctx).emit(&mut out, self.path, self.contents, self.ownership)?;
        Ok(out)
    }
}
