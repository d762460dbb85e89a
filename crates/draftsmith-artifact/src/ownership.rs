//! Ownership classes and the glob-driven ownership policy
//!
//! Every generated file belongs to one [`Ownership`] class. Generators pick a
//! default class for the files they emit; an [`OwnershipPolicy`] compiled from
//! configuration can override it per path.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// Whether a generated file may be silently overwritten on a later build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// The pipeline owns the file and rewrites it on every build
    Regenerate,
    /// Written once; afterwards the file belongs to the user unless forced
    ScaffoldOnly,
}

impl Ownership {
    /// May an existing file be replaced?
    #[inline]
    #[must_use]
    pub const fn may_overwrite(self, force: bool) -> bool {
        match self {
            Self::Regenerate => true,
            Self::ScaffoldOnly => force,
        }
    }
}

impl Display for Ownership {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regenerate => f.write_str("regenerate"),
            Self::ScaffoldOnly => f.write_str("scaffold_only"),
        }
    }
}

/// One `pattern → ownership` configuration entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRule {
    /// Glob matched against project-relative paths (`src/models/**`)
    pub pattern: String,
    /// Class applied to matching paths
    pub ownership: Ownership,
}

impl OwnershipRule {
    /// Create a rule
    #[inline]
    #[must_use]
    pub fn new(pattern: impl Into<String>, ownership: Ownership) -> Self {
        Self {
            pattern: pattern.into(),
            ownership,
        }
    }
}

/// Compiled ownership rules. First matching rule wins.
#[derive(Debug, Clone)]
pub struct OwnershipPolicy {
    rules: Vec<OwnershipRule>,
    set: GlobSet,
}

impl OwnershipPolicy {
    /// Compile a rule list into a policy
    ///
    /// # Errors
    /// Returns error if any pattern is not a valid glob
    pub fn new(rules: Vec<OwnershipRule>) -> Result<Self, OwnershipError> {
        let mut builder = GlobSetBuilder::new();
        for rule in &rules {
            let glob = Glob::new(&rule.pattern).map_err(|source| OwnershipError::InvalidPattern {
                pattern: rule.pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| OwnershipError::InvalidPattern {
            pattern: String::new(),
            source,
        })?;
        Ok(Self { rules, set })
    }

    /// Policy without overrides: every generator default applies
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            set: GlobSet::empty(),
        }
    }

    /// Configured override for a project-relative path, if any
    #[must_use]
    pub fn lookup(&self, relative: &Path) -> Option<Ownership> {
        self.set
            .matches(relative)
            .into_iter()
            .min()
            .map(|idx| self.rules[idx].ownership)
    }

    /// Ownership for a path, falling back to the generator's default
    #[inline]
    #[must_use]
    pub fn resolve(&self, relative: &Path, default: Ownership) -> Ownership {
        self.lookup(relative).unwrap_or(default)
    }

    /// Configured rules in priority order
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[OwnershipRule] {
        &self.rules
    }
}

impl Default for OwnershipPolicy {
    fn default() -> Self {
        Self::empty()
    }
}

/// Errors building an ownership policy
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// Glob failed to compile
    #[error("invalid ownership pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scaffold_only_needs_force() {
        assert!(Ownership::Regenerate.may_overwrite(false));
        assert!(!Ownership::ScaffoldOnly.may_overwrite(false));
        assert!(Ownership::ScaffoldOnly.may_overwrite(true));
    }

    #[test]
    fn first_matching_rule_wins() {
        let policy = OwnershipPolicy::new(vec![
            OwnershipRule::new("src/models/post.rs", Ownership::Regenerate),
            OwnershipRule::new("src/models/**", Ownership::ScaffoldOnly),
        ])
        .unwrap();

        assert_eq!(
            policy.lookup(Path::new("src/models/post.rs")),
            Some(Ownership::Regenerate)
        );
        assert_eq!(
            policy.lookup(Path::new("src/models/user.rs")),
            Some(Ownership::ScaffoldOnly)
        );
        assert_eq!(policy.lookup(Path::new("types/models.ts")), None);
    }

    #[test]
    fn resolve_falls_back_to_default() {
        let policy = OwnershipPolicy::empty();
        assert_eq!(
            policy.resolve(Path::new("anything"), Ownership::ScaffoldOnly),
            Ownership::ScaffoldOnly
        );
    }

    #[test]
    fn invalid_glob_is_rejected() {
        let err = OwnershipPolicy::new(vec![OwnershipRule::new("src/[", Ownership::Regenerate)])
            .unwrap_err();
        assert!(err.to_string().contains("src/["));
    }

    #[test]
    fn ownership_serde_is_snake_case() {
        let json = serde_json::to_string(&Ownership::ScaffoldOnly).unwrap();
        assert_eq!(json, "\"scaffold_only\"");
        let parsed: Ownership = serde_json::from_str("\"regenerate\"").unwrap();
        assert_eq!(parsed, Ownership::Regenerate);
    }
}
