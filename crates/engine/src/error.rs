//! Common error types for the engine crate.

use endpoint::EndpointError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Which side of a file/directory conflict is the directory.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Conflict {
    /// A source file would replace a destination directory.
    FileOverDirectory,
    /// A source directory would replace a destination file.
    DirectoryOverFile,
}

impl Conflict {
    /// Noun for the destination side.
    #[must_use]
    pub const fn destination_noun(self) -> &'static str {
        match self {
            Self::FileOverDirectory => "directory",
            Self::DirectoryOverFile => "file",
        }
    }

    /// Noun for the source side.
    #[must_use]
    pub const fn source_noun(self) -> &'static str {
        match self {
            Self::FileOverDirectory => "file",
            Self::DirectoryOverFile => "directory",
        }
    }
}

/// Errors that can occur while reconciling or executing a sync.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A type conflict would destroy data and overwriting was not allowed.
    #[error(
        "refusing to overwrite {} {destination_path} with {} {source_path}",
        .conflict.destination_noun(),
        .conflict.source_noun()
    )]
    OverwriteRefused {
        /// Conflicting source path.
        source_path: String,
        /// Conflicting destination path.
        destination_path: String,
        /// Shape of the conflict.
        conflict: Conflict,
    },
    /// An endpoint operation failed during execution.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_message_names_both_sides() {
        let error = EngineError::OverwriteRefused {
            source_path: "/home/me/a".to_owned(),
            destination_path: "/sdcard/a".to_owned(),
            conflict: Conflict::FileOverDirectory,
        };
        assert_eq!(
            error.to_string(),
            "refusing to overwrite directory /sdcard/a with file /home/me/a"
        );

        let error = EngineError::OverwriteRefused {
            source_path: "/sdcard/b".to_owned(),
            destination_path: "/home/me/b".to_owned(),
            conflict: Conflict::DirectoryOverFile,
        };
        assert_eq!(
            error.to_string(),
            "refusing to overwrite file /home/me/b with directory /sdcard/b"
        );
    }
}
