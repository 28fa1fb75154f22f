use endpoint::EndpointError;

/// Failures that abort a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The endpoint failed outside of the recoverable symlink cases.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    /// A device, fifo or socket was found; such entries cannot be synchronised.
    #[error("{path}: unsupported file type")]
    UnsupportedEntry {
        /// Offending path.
        path: String,
    },
}

impl SnapshotError {
    /// Returns the endpoint error when the snapshot failed on one.
    #[must_use]
    pub const fn endpoint_error(&self) -> Option<&EndpointError> {
        match self {
            Self::Endpoint(error) => Some(error),
            Self::UnsupportedEntry { .. } => None,
        }
    }
}
