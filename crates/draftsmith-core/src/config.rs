//! Build configuration
//!
//! [`BuildConfig`] is built in code with `with_*` methods or loaded from an
//! optional `draftsmith.toml` at the project root:
//!
//! ```toml
//! draft_path = "draft.yaml"
//! state_path = ".draftsmith/state.json"
//!
//! [[ownership]]
//! pattern = "src/routes.rs"
//! ownership = "scaffold_only"
//! ```

use draftsmith_artifact::{Ownership, OwnershipError, OwnershipPolicy, OwnershipRule};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Config file looked up at the project root
pub const CONFIG_FILE: &str = "draftsmith.toml";

/// Default draft path, relative to the project root
pub const DEFAULT_DRAFT: &str = "draft.yaml";

/// Default state path, relative to the project root
pub const DEFAULT_STATE: &str = ".draftsmith/state.json";

/// Where the pipeline reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root; never read from the config file
    #[serde(skip)]
    pub project_root: PathBuf,
    /// Draft file, relative to the root unless absolute
    pub draft_path: PathBuf,
    /// State file, relative to the root unless absolute
    pub state_path: PathBuf,
    /// Ownership overrides, first match wins
    pub ownership: Vec<OwnershipRule>,
}

impl BuildConfig {
    /// Default configuration rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: root.into(),
            ..Self::default()
        }
    }

    /// Load `draftsmith.toml` from `root`, or defaults when it is absent
    ///
    /// # Errors
    /// Unreadable file, invalid TOML or an invalid ownership glob
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let root = root.into();
        let path = root.join(CONFIG_FILE);
        let mut config = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str::<Self>(&text).map_err(|source| ConfigError::Toml {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        config.project_root = root;
        config.policy()?;
        tracing::debug!(root = %config.project_root.display(), rules = config.ownership.len(), "configuration loaded");
        Ok(config)
    }

    /// With draft path
    #[inline]
    #[must_use]
    pub fn with_draft_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.draft_path = path.into();
        self
    }

    /// With state path
    #[inline]
    #[must_use]
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// With an ownership override appended
    #[inline]
    #[must_use]
    pub fn with_ownership(mut self, pattern: impl Into<String>, ownership: Ownership) -> Self {
        self.ownership.push(OwnershipRule::new(pattern, ownership));
        self
    }

    /// Project root
    #[inline]
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Draft file resolved against the root
    #[must_use]
    pub fn draft_file(&self) -> PathBuf {
        self.project_root.join(&self.draft_path)
    }

    /// State file resolved against the root
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.project_root.join(&self.state_path)
    }

    /// Compile the ownership rules
    ///
    /// # Errors
    /// An invalid glob pattern
    pub fn policy(&self) -> Result<OwnershipPolicy, ConfigError> {
        Ok(OwnershipPolicy::new(self.ownership.clone())?)
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            draft_path: PathBuf::from(DEFAULT_DRAFT),
            state_path: PathBuf::from(DEFAULT_STATE),
            ownership: Vec::new(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("io error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`BuildConfig`]
    #[error("invalid config {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Ownership glob does not compile
    #[error(transparent)]
    Ownership(#[from] OwnershipError),
}
