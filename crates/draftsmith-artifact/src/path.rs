//! Project-root-relative path handling
//!
//! Provides [`ProjectRoot`], which resolves paths against the project root and
//! refuses any path that would land outside of it. Resolution is lexical so it
//! also works for files that do not exist yet; the part of the path that does
//! exist on disk is then canonicalized, so a symlink inside the root cannot
//! lead a write outside of it.

use std::path::{Component, Path, PathBuf};

/// Root directory every generated path must stay inside
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectRoot(PathBuf);

impl ProjectRoot {
    /// Create from a directory path. Relative roots are normalized but kept relative.
    #[inline]
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self(normalize(root.as_ref()))
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Join a project-relative path without escape checks
    #[inline]
    #[must_use]
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        normalize(&self.0.join(relative))
    }

    /// Resolve `candidate` (absolute, or relative to the root) and check it
    /// stays within the root, both lexically and after following symlinks.
    ///
    /// # Errors
    /// Returns [`PathError::Escape`] if the resolved path is outside the root
    pub fn resolve(&self, candidate: impl AsRef<Path>) -> Result<PathBuf, PathError> {
        let candidate = candidate.as_ref();
        let resolved = if candidate.is_absolute() {
            normalize(candidate)
        } else {
            normalize(&self.0.join(candidate))
        };

        if resolved.starts_with(&self.0)
            && !escapes(candidate)
            && stays_inside_on_disk(&self.0, &resolved)
        {
            Ok(resolved)
        } else {
            Err(PathError::Escape {
                path: candidate.to_path_buf(),
                root: self.0.clone(),
            })
        }
    }

    /// Path relative to the root, if inside it
    #[must_use]
    pub fn relative<'a>(&self, path: &'a Path) -> Option<&'a Path> {
        path.strip_prefix(&self.0).ok()
    }
}

/// Lexically normalize a path: drop `.`, fold `..` into its parent.
///
/// A `..` that cannot be folded is kept, which [`ProjectRoot::resolve`] treats
/// as an escape.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// A relative candidate whose `..` segments climb above its own start.
fn escapes(candidate: &Path) -> bool {
    if candidate.is_absolute() {
        return false;
    }
    let mut depth: i64 = 0;
    for component in candidate.components() {
        match component {
            Component::ParentDir => depth -= 1,
            Component::Normal(_) => depth += 1,
            _ => {}
        }
        if depth < 0 {
            return true;
        }
    }
    false
}

// Canonicalize the deepest existing ancestor of `path` and compare it with the
// canonical root. A root that does not exist yet has nothing to follow; a
// dangling symlink is refused.
fn stays_inside_on_disk(root: &Path, path: &Path) -> bool {
    let Ok(real_root) = root.canonicalize() else {
        return true;
    };
    let mut existing = path;
    loop {
        if existing.symlink_metadata().is_ok() {
            return existing
                .canonicalize()
                .is_ok_and(|real| real.starts_with(&real_root));
        }
        match existing.parent() {
            Some(parent) => existing = parent,
            None => return true,
        }
    }
}

/// Errors related to project paths
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Path resolves outside the project root
    #[error("path '{}' escapes project root '{}'", path.display(), root.display())]
    Escape { path: PathBuf, root: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_dots() {
        assert_eq!(
            normalize(Path::new("/a/b/./c/../d")),
            PathBuf::from("/a/b/d")
        );
        assert_eq!(normalize(Path::new("a/../../b")), PathBuf::from("../b"));
    }

    #[test]
    fn resolve_relative_inside_root() {
        let root = ProjectRoot::new("/project");
        assert_eq!(
            root.resolve("src/models/post.rs").unwrap(),
            PathBuf::from("/project/src/models/post.rs")
        );
    }

    #[test]
    fn resolve_absolute_inside_root() {
        let root = ProjectRoot::new("/project");
        assert!(root.resolve("/project/types/models.ts").is_ok());
    }

    #[test]
    fn resolve_rejects_parent_escape() {
        let root = ProjectRoot::new("/project");
        assert!(matches!(
            root.resolve("../etc/passwd"),
            Err(PathError::Escape { .. })
        ));
        assert!(root.resolve("/project/../etc/passwd").is_err());
        assert!(root.resolve("src/../../outside").is_err());
    }

    #[test]
    fn resolve_rejects_sibling_prefix() {
        let root = ProjectRoot::new("/project");
        assert!(root.resolve("/project-other/file").is_err());
        assert!(root.resolve("/etc/passwd").is_err());
    }

    #[test]
    fn relative_strips_root() {
        let root = ProjectRoot::new("/project");
        let path = PathBuf::from("/project/src/routes.rs");
        assert_eq!(root.relative(&path), Some(Path::new("src/routes.rs")));
    }

    #[cfg(unix)]
    mod symlinks {
        use super::*;
        use std::fs;
        use std::os::unix::fs::symlink;

        fn layout() -> (tempfile::TempDir, ProjectRoot, PathBuf) {
            let dir = tempfile::tempdir().unwrap();
            let project = dir.path().join("project");
            let secret = dir.path().join("secret");
            fs::create_dir_all(project.join("src")).unwrap();
            fs::create_dir_all(&secret).unwrap();
            (dir, ProjectRoot::new(&project), secret)
        }

        #[test]
        fn directory_link_out_of_root_is_refused() {
            let (_dir, root, secret) = layout();
            symlink(&secret, root.join("link")).unwrap();

            assert!(matches!(
                root.resolve("link/file.txt"),
                Err(PathError::Escape { .. })
            ));
            assert!(root.resolve(root.join("link/deeper/file.txt")).is_err());
        }

        #[test]
        fn file_link_out_of_root_is_refused() {
            let (_dir, root, secret) = layout();
            fs::write(secret.join("key"), "hidden").unwrap();
            symlink(secret.join("key"), root.join("src/key")).unwrap();
            assert!(root.resolve("src/key").is_err());
        }

        #[test]
        fn dangling_link_is_refused() {
            let (_dir, root, secret) = layout();
            symlink(secret.join("missing"), root.join("gone")).unwrap();
            assert!(root.resolve("gone").is_err());
        }

        #[test]
        fn links_within_root_are_allowed() {
            let (_dir, root, _secret) = layout();
            symlink(root.join("src"), root.join("alias")).unwrap();
            assert_eq!(
                root.resolve("alias/new.rs").unwrap(),
                root.join("alias/new.rs")
            );
            assert!(root.resolve("src/not/yet/created.rs").is_ok());
        }
    }

    proptest::proptest! {
        #[test]
        fn resolved_paths_never_leave_root(
            segments in proptest::collection::vec(
                proptest::prop_oneof!["[a-z]{1,6}", proptest::strategy::Just("..".to_string()), proptest::strategy::Just(".".to_string())],
                0..8,
            )
        ) {
            let root = ProjectRoot::new("/project");
            let candidate: PathBuf = segments.iter().collect();
            if let Ok(resolved) = root.resolve(&candidate) {
                proptest::prop_assert!(resolved.starts_with("/project"));
                proptest::prop_assert!(!resolved.components().any(|c| c == Component::ParentDir));
            }
        }
    }
}
