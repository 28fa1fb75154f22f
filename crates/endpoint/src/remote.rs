use std::ffi::OsStr;

use shell_io::listing::{self, ListingError, ListingKind, ListingLine};
use shell_io::{
    AdbCommand, Encoding, ShellChannel, ShellError, ShellSession, TransferCommand, join_argv, stamp,
};
use time::UtcOffset;

use crate::{EntryKind, Endpoint, EndpointError, PathStyle, StatRecord, Times};

/// Endpoint reached through a line-oriented remote shell.
///
/// Metadata comes from parsing `ls` output, mutations are plain shell
/// commands that must stay silent, and file content arrives through the
/// configured transfer, normally `adb push`.
pub struct RemoteShellEndpoint<C = ShellSession> {
    channel: C,
    transfer: TransferCommand,
    offset: UtcOffset,
    paths: PathStyle,
}

impl RemoteShellEndpoint<ShellSession> {
    /// Starts `adb shell` for `adb` and wraps it in an endpoint.
    ///
    /// Listing timestamps are read in the host's local UTC offset.
    pub fn connect(
        adb: &AdbCommand,
        encoding: &'static Encoding,
    ) -> Result<Self, EndpointError> {
        let session = ShellSession::spawn(adb.shell(), encoding)?;
        Ok(Self::new(session, adb.push_transfer(), stamp::local_offset()))
    }

    /// Closes the shell session and waits for it to exit.
    pub fn close(self) -> Result<(), EndpointError> {
        let status = self
            .channel
            .close()
            .map_err(|error| EndpointError::Shell(ShellError::Io(error)))?;
        if !status.success() {
            tracing::debug!(%status, "adb shell exited unsuccessfully");
        }
        Ok(())
    }
}

impl<C: ShellChannel> RemoteShellEndpoint<C> {
    /// Wraps an existing channel.
    ///
    /// `offset` is the UTC offset the device's `ls` prints timestamps in.
    pub fn new(channel: C, transfer: TransferCommand, offset: UtcOffset) -> Self {
        Self {
            channel,
            transfer,
            offset,
            paths: PathStyle::remote(),
        }
    }

    /// Runs the no-op command `:` and returns the adb daemon start-up lines it
    /// printed.
    ///
    /// Any other output means the device cannot be used and is reported as
    /// [`EndpointError::ConnectivityFailed`].
    pub fn test_connection(&mut self) -> Result<Vec<String>, EndpointError> {
        let lines = match self.channel.run(&[":"]) {
            Ok(lines) => lines,
            Err(ShellError::UnexpectedEof { output, .. }) => {
                let line = output
                    .into_iter()
                    .find(|line| !listing::is_daemon_chatter(line))
                    .unwrap_or_else(|| "adb shell exited".to_owned());
                return Err(EndpointError::ConnectivityFailed { line });
            }
            Err(error) => return Err(error.into()),
        };

        if let Some(line) = lines.iter().find(|line| !listing::is_daemon_chatter(line)) {
            return Err(EndpointError::ConnectivityFailed { line: line.clone() });
        }
        Ok(lines)
    }

    fn run(&mut self, argv: &[&str]) -> Result<Vec<String>, EndpointError> {
        self.channel.run(argv).map_err(EndpointError::from)
    }

    fn run_silent(&mut self, argv: &[&str]) -> Result<(), EndpointError> {
        let lines = self.run(argv)?;
        match lines.into_iter().next() {
            None => Ok(()),
            Some(line) => Err(unexpected_line(argv, &line)),
        }
    }

    fn record_from_line(&self, line: &ListingLine) -> StatRecord {
        let kind = match line.kind {
            ListingKind::Regular => EntryKind::File,
            ListingKind::Directory => EntryKind::Directory,
            ListingKind::Symlink => EntryKind::Symlink,
            ListingKind::BlockDevice
            | ListingKind::CharDevice
            | ListingKind::Fifo
            | ListingKind::Socket => EntryKind::Other,
        };
        let modified = stamp::to_unix_seconds(line.modified, self.offset);
        StatRecord {
            kind,
            times: Times::floored(modified, modified),
            size: line.size,
        }
    }
}

fn unexpected_line(argv: &[&str], line: &str) -> EndpointError {
    EndpointError::ProtocolViolation {
        command: join_argv(argv),
        detail: format!("unexpected line {line:?}"),
    }
}

fn no_output(argv: &[&str]) -> EndpointError {
    EndpointError::ProtocolViolation {
        command: join_argv(argv),
        detail: "command printed nothing".to_owned(),
    }
}

fn listing_error(argv: &[&str], path: &str, error: ListingError) -> EndpointError {
    let path = path.to_owned();
    match error {
        ListingError::NotFound(_) => EndpointError::NotFound { path },
        ListingError::NotADirectory(_) => EndpointError::NotADirectory { path },
        ListingError::PermissionDenied(_) => EndpointError::PermissionDenied { path },
        ListingError::Unrecognized(line) => unexpected_line(argv, &line),
    }
}

impl<C: ShellChannel> Endpoint for RemoteShellEndpoint<C> {
    fn paths(&self) -> PathStyle {
        self.paths
    }

    fn stat(&mut self, path: &str) -> Result<StatRecord, EndpointError> {
        let argv = ["ls", "-lad", path];
        let lines = self.run(&argv)?;
        let line = lines.first().ok_or_else(|| no_output(&argv))?;
        let parsed = listing::parse_line(line).map_err(|error| listing_error(&argv, path, error))?;
        Ok(self.record_from_line(&parsed))
    }

    fn list_children(&mut self, path: &str) -> Result<Vec<(String, StatRecord)>, EndpointError> {
        let argv = ["ls", "-la", path];
        let lines = self.run(&argv)?;
        let mut children = Vec::with_capacity(lines.len());
        for line in &lines {
            if listing::is_total_line(line) {
                continue;
            }
            let parsed =
                listing::parse_line(line).map_err(|error| listing_error(&argv, path, error))?;
            if parsed.name == "." || parsed.name == ".." {
                continue;
            }
            let record = self.record_from_line(&parsed);
            children.push((parsed.name, record));
        }
        Ok(children)
    }

    fn resolve_symlink(&mut self, path: &str) -> Result<String, EndpointError> {
        let argv = ["realpath", path];
        let lines = self.run(&argv)?;
        let line = lines.first().ok_or_else(|| no_output(&argv))?;
        listing::parse_realpath(line)
            .map(str::to_owned)
            .map_err(|error| listing_error(&argv, path, error))
    }

    fn remove_file(&mut self, path: &str) -> Result<(), EndpointError> {
        self.run_silent(&["rm", path])
    }

    fn remove_dir_all(&mut self, path: &str) -> Result<(), EndpointError> {
        self.run_silent(&["rm", "-r", path])
    }

    fn create_dir_all(&mut self, path: &str) -> Result<(), EndpointError> {
        self.run_silent(&["mkdir", "-p", path])
    }

    fn set_times(&mut self, path: &str, times: Times) -> Result<(), EndpointError> {
        let stamp_for = |seconds: i64| {
            stamp::touch_stamp(seconds, self.offset).ok_or_else(|| {
                EndpointError::TimestampOutOfRange {
                    path: path.to_owned(),
                    seconds,
                }
            })
        };
        let accessed = stamp_for(times.accessed)?;
        let modified = stamp_for(times.modified)?;
        self.run_silent(&["touch", "-at", &accessed, "-mt", &modified, path])
    }

    fn push_file(
        &mut self,
        source: &str,
        destination: &str,
        show_progress: bool,
    ) -> Result<(), EndpointError> {
        self.transfer
            .run(OsStr::new(source), OsStr::new(destination), show_progress)
            .map_err(EndpointError::from)
    }
}
