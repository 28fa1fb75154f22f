use std::ffi::{OsStr, OsString};
use std::process::Command;

use crate::TransferCommand;

/// The adb binary together with the global flags and options it is run with.
///
/// Flags and options are emitted in the order they were added, ahead of the
/// adb subcommand (`shell`, `push` or `pull`).
#[derive(Clone, Debug)]
pub struct AdbCommand {
    program: OsString,
    options: Vec<OsString>,
}

impl AdbCommand {
    /// Creates a command that runs `program` without extra options.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            options: Vec::new(),
        }
    }

    /// Appends a single-letter style flag; `d` becomes `-d`.
    pub fn push_flag(&mut self, flag: &str) {
        self.options.push(OsString::from(format!("-{flag}")));
    }

    /// Appends an option with a value; `("P", "5037")` becomes `-P 5037`.
    pub fn push_option(&mut self, option: &str, value: impl Into<OsString>) {
        self.options.push(OsString::from(format!("-{option}")));
        self.options.push(value.into());
    }

    /// Returns the configured program.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Builds the `adb shell` invocation used for the persistent session.
    #[must_use]
    pub fn shell(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.options).arg("shell");
        command
    }

    /// Returns the transfer that copies a local file onto the device.
    #[must_use]
    pub fn push_transfer(&self) -> TransferCommand {
        self.transfer("push")
    }

    /// Returns the transfer that copies a device file onto the local machine.
    #[must_use]
    pub fn pull_transfer(&self) -> TransferCommand {
        self.transfer("pull")
    }

    fn transfer(&self, verb: &str) -> TransferCommand {
        let mut args = self.options.clone();
        args.push(OsString::from(verb));
        TransferCommand::new(self.program.clone(), args)
    }

    #[cfg(test)]
    pub(crate) fn command_parts_for_testing(&self) -> (OsString, Vec<OsString>) {
        let command = self.shell();
        (
            command.get_program().to_os_string(),
            command.get_args().map(OsStr::to_os_string).collect(),
        )
    }
}

impl Default for AdbCommand {
    fn default() -> Self {
        Self::new("adb")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_to_strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn assembles_minimal_shell_command() {
        let command = AdbCommand::default();
        let (program, args) = command.command_parts_for_testing();

        assert_eq!(program, OsString::from("adb"));
        assert_eq!(args_to_strings(&args), vec!["shell".to_owned()]);
    }

    #[test]
    fn flags_and_options_precede_subcommand() {
        let mut command = AdbCommand::new("/opt/platform-tools/adb");
        command.push_flag("d");
        command.push_option("P", "5037");
        command.push_option("s", "emulator-5554");

        let (program, args) = command.command_parts_for_testing();
        assert_eq!(program, OsString::from("/opt/platform-tools/adb"));
        assert_eq!(
            args_to_strings(&args),
            vec!["-d", "-P", "5037", "-s", "emulator-5554", "shell"]
        );
    }

    #[test]
    fn transfers_share_global_options() {
        let mut command = AdbCommand::new("adb");
        command.push_flag("e");

        let push = command.push_transfer();
        let (program, args) = push.command_parts("/tmp/a".as_ref(), "/sdcard/a".as_ref());
        assert_eq!(program, OsString::from("adb"));
        assert_eq!(args_to_strings(&args), vec!["-e", "push", "/tmp/a", "/sdcard/a"]);

        let pull = command.pull_transfer();
        let (_, args) = pull.command_parts("/sdcard/a".as_ref(), "/tmp/a".as_ref());
        assert_eq!(args_to_strings(&args), vec!["-e", "pull", "/sdcard/a", "/tmp/a"]);
    }
}
