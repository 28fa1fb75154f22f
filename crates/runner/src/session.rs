use endpoint::{Endpoint, LocalEndpoint, RemoteShellEndpoint};
use logging::Reporter;
use shell_io::{AdbCommand, Encoding};

use crate::{Direction, RunError};

/// The two endpoints of a device sync, sharing one adb configuration.
///
/// The local side receives files through `adb pull`; the device side keeps
/// one `adb shell` open for the whole run and receives files through
/// `adb push`.
pub struct DeviceSession {
    local: LocalEndpoint,
    remote: RemoteShellEndpoint,
}

impl DeviceSession {
    /// Opens the shell and checks that the device answers.
    ///
    /// Lines the adb daemon prints while starting up are passed on to
    /// `reporter`; anything else means the device is unusable.
    ///
    /// # Errors
    ///
    /// [`endpoint::EndpointError::ConnectivityFailed`] (wrapped) when the
    /// preflight command prints unexpected output or the shell dies, and a
    /// shell spawn error when adb cannot be started.
    pub fn connect(
        adb: &AdbCommand,
        encoding: &'static Encoding,
        reporter: &dyn Reporter,
    ) -> Result<Self, RunError> {
        tracing::debug!(program = ?adb.program(), encoding = encoding.name(), "opening adb shell");
        let mut remote = RemoteShellEndpoint::connect(adb, encoding)?;
        for line in remote.test_connection()? {
            reporter.info(format_args!("{line}"));
        }
        Ok(Self {
            local: LocalEndpoint::new(adb.pull_transfer()),
            remote,
        })
    }

    /// Returns `(source, destination)` for `direction`.
    pub fn endpoints(
        &mut self,
        direction: Direction,
    ) -> (&mut dyn Endpoint, &mut dyn Endpoint) {
        match direction {
            Direction::Push => (&mut self.local, &mut self.remote),
            Direction::Pull => (&mut self.remote, &mut self.local),
        }
    }

    /// Closes the shell and waits for adb to exit.
    pub fn close(self) -> Result<(), RunError> {
        self.remote.close()?;
        Ok(())
    }
}
