#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front-end of `adbsync`. It parses the
//! arguments, installs the log subscriber, opens the device session and
//! drives a [`runner`] sync, logging every snapshot and diff tree before the
//! sync phase starts.
//!
//! # Design
//!
//! [`run`] takes the argument list and the two output handles, so the whole
//! front-end can be exercised in-process. Parsing uses the `clap` builder
//! API; `--help` and `--version` are written to the standard output handle,
//! usage errors to the standard error handle.
//!
//! # Invariants
//!
//! - `run` never panics on bad input; every failure becomes an
//!   [`ExitCode`].
//! - Exclude files are read before the device is contacted.
//! - The adb shell is closed exactly once, also when the run fails.
//!
//! # Examples
//!
//! ```
//! use cli::{ExitCode, run};
//!
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let code = run(["adbsync", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(code, ExitCode::Ok);
//! assert!(String::from_utf8_lossy(&stdout).starts_with("adbsync "));
//! ```

use std::ffi::OsString;
use std::io::Write;

use clap::error::ErrorKind;
use logging::{Reporter, TracingReporter};
use runner::{DeviceSession, RunError};

mod command;
mod render;

pub use render::{log_report, tree_lines};
pub use runner::ExitCode;

use command::{Invocation, parse_args};

/// Runs the front-end with `arguments`, the program name included.
///
/// Returns the exit code the process should end with.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    let invocation = match parse_args(arguments) {
        Ok(invocation) => invocation,
        Err(error) => return report_usage(&error, stdout, stderr),
    };

    // Embedding processes and repeated in-process runs may already own the
    // global subscriber.
    if let Err(error) = logging::init_tracing(invocation.verbosity, invocation.no_color) {
        tracing::debug!(%error, "keeping the existing log subscriber");
    }

    match sync(invocation, &TracingReporter) {
        Ok(()) => ExitCode::Ok,
        Err(error) => {
            let code = error.exit_code();
            tracing::debug!(?error, %code, "run failed");
            let _ = writeln!(stderr, "adbsync: {error}");
            code
        }
    }
}

fn report_usage<Out: Write, Err: Write>(
    error: &clap::Error,
    stdout: &mut Out,
    stderr: &mut Err,
) -> ExitCode {
    let rendered = error.render().to_string();
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{rendered}");
            ExitCode::Ok
        }
        _ => {
            let _ = write!(stderr, "{rendered}");
            ExitCode::Failure
        }
    }
}

fn sync(invocation: Invocation, reporter: &dyn Reporter) -> Result<(), RunError> {
    let Invocation {
        mut options,
        exclude_from,
        adb,
        encoding,
        ..
    } = invocation;

    for path in &exclude_from {
        options.excludes.extend(filters::read_patterns(path)?);
    }

    let mut session = DeviceSession::connect(&adb, encoding, reporter)?;
    let outcome = sync_over(&mut session, &options, reporter);
    let closed = session.close();
    outcome.and(closed)
}

fn sync_over(
    session: &mut DeviceSession,
    options: &runner::SyncOptions,
    reporter: &dyn Reporter,
) -> Result<(), RunError> {
    let (source, destination) = session.endpoints(options.direction);
    let report = runner::prepare(options, source, destination, reporter)?;
    log_report(&report, reporter);

    reporter.info(format_args!("SYNCING"));
    reporter.info(format_args!(""));
    runner::execute(&report, options, source, destination, reporter)
}
