use endpoint::EndpointError;
use engine::EngineError;
use filters::FilterError;
use flist::SnapshotError;
use shell_io::ShellError;

use crate::ExitCode;

/// Fatal failures of a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The destination root is a symbolic link; what to sync into is
    /// ambiguous.
    #[error("{path}: destination is a symlink")]
    DestinationIsSymlink {
        /// Destination path as given.
        path: String,
    },
    /// An exclude pattern or exclude file was rejected.
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// Snapshotting one of the roots failed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Reconciliation or execution failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// An endpoint call outside snapshots and execution failed.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

impl RunError {
    /// Returns the underlying endpoint failure, if there is one.
    #[must_use]
    pub const fn endpoint_error(&self) -> Option<&EndpointError> {
        match self {
            Self::Endpoint(error) | Self::Engine(EngineError::Endpoint(error)) => Some(error),
            Self::Snapshot(error) => error.endpoint_error(),
            Self::DestinationIsSymlink { .. } | Self::Filter(_) | Self::Engine(_) => None,
        }
    }

    /// Maps the failure to the exit code the binary reports.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if let Self::Engine(EngineError::OverwriteRefused { .. }) = self {
            return ExitCode::OverwriteRefused;
        }
        match self.endpoint_error() {
            Some(EndpointError::ConnectivityFailed { .. } | EndpointError::Shell(ShellError::Spawn { .. })) => {
                ExitCode::Connectivity
            }
            Some(error) if error.is_protocol_error() => ExitCode::Protocol,
            Some(EndpointError::TransferFailed { .. }) => ExitCode::Transfer,
            _ => ExitCode::Failure,
        }
    }
}
