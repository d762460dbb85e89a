//! Error types for draft parsing

use std::path::PathBuf;

/// Errors turning draft text into a [`Specification`](crate::Specification)
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Text is not valid YAML
    #[error("syntax error: {message}")]
    Syntax { message: String },

    /// Deserialized value is not a mapping
    #[error("draft must be a mapping at the top level, got {found}")]
    NotAMapping { found: &'static str },

    /// Validator reported one or more problems
    #[error("invalid draft: {}", errors.join("; "))]
    Invalid { errors: Vec<String> },

    /// IO error reading the draft file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Create syntax error
    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Every itemized problem behind this error
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        match self {
            Self::Invalid { errors } => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::syntax_error(err.to_string())
    }
}
