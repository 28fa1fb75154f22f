use std::io;
use std::path::PathBuf;

/// Error produced while building an [`ExcludeSet`](crate::ExcludeSet).
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// A pattern could not be compiled into a glob matcher.
    #[error("failed to compile exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// Compilation failure reported by `globset`.
        #[source]
        source: globset::Error,
    },
    /// An exclude file could not be read.
    #[error("failed to read exclude file '{}': {source}", path.display())]
    Read {
        /// Path of the exclude file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl FilterError {
    /// Returns the pattern that failed to compile, if any.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::InvalidPattern { pattern, .. } => Some(pattern),
            Self::Read { .. } => None,
        }
    }
}
