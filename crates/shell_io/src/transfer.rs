use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};

use crate::ShellError;

/// External program that copies one file from `source` to `destination`.
///
/// The program is invoked as `<program> <args...> <source> <destination>`.
/// `adb push`/`adb pull` are the production instances; any program with the
/// same calling convention (for example `cp`) works.
#[derive(Clone, Debug)]
pub struct TransferCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl TransferCommand {
    /// Creates a transfer running `program` with the leading `args`.
    #[must_use]
    pub fn new(program: impl Into<OsString>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Copies `source` to `destination`, blocking until the program exits.
    ///
    /// When `show_progress` is false the program's standard output and
    /// standard error are discarded.
    ///
    /// # Errors
    ///
    /// [`ShellError::Spawn`] when the program cannot be started and
    /// [`ShellError::TransferFailed`] when it exits unsuccessfully.
    pub fn run(
        &self,
        source: &OsStr,
        destination: &OsStr,
        show_progress: bool,
    ) -> Result<(), ShellError> {
        let (program, args) = self.command_parts(source, destination);
        let mut command = Command::new(&program);
        command.args(&args).stdin(Stdio::null());
        if !show_progress {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        tracing::trace!(program = ?program, args = ?args, "running transfer");
        let status = command.status().map_err(|source| ShellError::Spawn {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(ShellError::TransferFailed {
                command: render(&program, &args),
                status,
            })
        }
    }

    pub(crate) fn command_parts(
        &self,
        source: &OsStr,
        destination: &OsStr,
    ) -> (OsString, Vec<OsString>) {
        let mut args = self.args.clone();
        args.push(source.to_os_string());
        args.push(destination.to_os_string());
        (self.program.clone(), args)
    }
}

fn render(program: &OsStr, args: &[OsString]) -> String {
    let mut rendered = program.to_string_lossy().into_owned();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.to_string_lossy());
    }
    rendered
}
