use std::io;
use std::process::ExitStatus;

use shell_io::ShellError;

/// Failures reported by endpoint operations.
///
/// The per-path variants (`NotFound`, `NotADirectory`, `PermissionDenied`)
/// are left to the caller to recover from; every other variant ends a run.
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The path does not exist.
    #[error("{path}: no such file or directory")]
    NotFound {
        /// Offending path.
        path: String,
    },
    /// A component of the path is not a directory.
    #[error("{path}: not a directory")]
    NotADirectory {
        /// Offending path.
        path: String,
    },
    /// Access to the path was denied.
    #[error("{path}: permission denied")]
    PermissionDenied {
        /// Offending path.
        path: String,
    },
    /// The remote shell produced output outside the expected grammar.
    #[error("protocol violation while running '{command}': {detail}")]
    ProtocolViolation {
        /// Command line that produced the output.
        command: String,
        /// What was wrong with the output.
        detail: String,
    },
    /// The preflight command printed something other than daemon start-up chatter.
    #[error("cannot reach the device: {line}")]
    ConnectivityFailed {
        /// First unexpected output line.
        line: String,
    },
    /// A push or pull exited unsuccessfully.
    #[error("transfer '{command}' failed with {status}")]
    TransferFailed {
        /// Rendered transfer command.
        command: String,
        /// Exit status of the transfer program.
        status: ExitStatus,
    },
    /// A local directory entry has a name that is not valid UTF-8.
    #[error("{path}: file name is not valid UTF-8")]
    InvalidName {
        /// Lossy rendering of the offending path.
        path: String,
    },
    /// A timestamp cannot be expressed in the device's `touch` format.
    #[error("{path}: timestamp {seconds} is out of range")]
    TimestampOutOfRange {
        /// Path whose timestamps were being set.
        path: String,
        /// Offending value in seconds since the Unix epoch.
        seconds: i64,
    },
    /// Any other local I/O failure.
    #[error("{path}: {source}")]
    Io {
        /// Path the operation was applied to.
        path: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The shell channel itself failed.
    #[error(transparent)]
    Shell(ShellError),
}

impl EndpointError {
    /// Classifies an I/O failure on `path`.
    pub fn from_io(path: impl Into<String>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::NotADirectory => Self::NotADirectory { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io { path, source },
        }
    }

    /// Returns `true` for the per-path variants a caller may recover from.
    #[must_use]
    pub const fn is_path_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::NotADirectory { .. } | Self::PermissionDenied { .. }
        )
    }

    /// Returns `true` when the failure means the remote shell cannot be trusted any more.
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::ProtocolViolation { .. } | Self::Shell(ShellError::UnexpectedEof { .. })
        )
    }
}

impl From<ShellError> for EndpointError {
    fn from(error: ShellError) -> Self {
        match error {
            ShellError::TransferFailed { command, status } => {
                Self::TransferFailed { command, status }
            }
            ShellError::UnexpectedEof { command, .. } => Self::ProtocolViolation {
                command,
                detail: "shell output ended before the end-of-command marker".to_owned(),
            },
            other => Self::Shell(other),
        }
    }
}
