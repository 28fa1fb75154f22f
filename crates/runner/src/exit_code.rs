//! Process exit codes reported by the `adbsync` binary.
//!
//! Every fatal [`RunError`](crate::RunError) maps onto exactly one
//! [`ExitCode`] through [`RunError::exit_code`](crate::RunError::exit_code),
//! so scripts can tell a missing device apart from a refused overwrite.

use std::fmt;

/// Exit status of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitCode {
    /// The sync completed.
    Ok = 0,

    /// Invalid command line, or a fatal error without a dedicated code.
    Failure = 1,

    /// The device could not be reached before any diffing started.
    Connectivity = 2,

    /// The remote shell printed something outside the expected grammar.
    Protocol = 3,

    /// A push or pull exited unsuccessfully.
    Transfer = 4,

    /// A file/directory conflict would have destroyed data and `--force` was
    /// not given.
    OverwriteRefused = 5,
}

impl ExitCode {
    /// Numeric value passed to the operating system.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short human-readable meaning.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "success",
            Self::Failure => "error",
            Self::Connectivity => "device unreachable",
            Self::Protocol => "unexpected shell output",
            Self::Transfer => "transfer failed",
            Self::OverwriteRefused => "refused to overwrite",
        }
    }

    /// `true` for [`ExitCode::Ok`].
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_u8())
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.as_u8())
    }
}
