use std::io;
use std::process::ExitStatus;

/// Failures raised while running shell commands or transfers.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// The program could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// Program that failed to launch.
        program: String,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// Reading from or writing to the session pipes failed.
    #[error("shell session I/O error: {0}")]
    Io(#[from] io::Error),
    /// The session reached end of output before echoing the end-of-command marker.
    #[error("shell session ended while running '{command}'")]
    UnexpectedEof {
        /// Command line that was in flight.
        command: String,
        /// Lines received before the session ended.
        output: Vec<String>,
    },
    /// A push or pull exited unsuccessfully.
    #[error("'{command}' failed with {status}")]
    TransferFailed {
        /// Rendered transfer command line.
        command: String,
        /// Exit status reported by the transfer process.
        status: ExitStatus,
    },
    /// The requested text encoding label is not known.
    #[error("unknown text encoding '{0}'")]
    UnknownEncoding(String),
}
