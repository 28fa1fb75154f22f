use std::ffi::OsStr;
use std::fs::{self, Metadata};

use filetime::FileTime;
use shell_io::TransferCommand;

use crate::{EntryKind, Endpoint, EndpointError, PathStyle, StatRecord, Times};

/// Endpoint backed by the filesystem of the machine running adbsync.
///
/// Metadata and mutations go straight to the operating system. File content
/// arrives through the configured transfer, normally `adb pull`.
#[derive(Clone, Debug)]
pub struct LocalEndpoint {
    transfer: TransferCommand,
    paths: PathStyle,
}

impl LocalEndpoint {
    /// Creates an endpoint that receives files through `transfer`.
    #[must_use]
    pub fn new(transfer: TransferCommand) -> Self {
        Self {
            transfer,
            paths: PathStyle::native(),
        }
    }
}

fn record_from_metadata(metadata: &Metadata) -> StatRecord {
    let file_type = metadata.file_type();
    let kind = if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    };

    let accessed = FileTime::from_last_access_time(metadata).unix_seconds();
    let modified = FileTime::from_last_modification_time(metadata).unix_seconds();
    StatRecord {
        kind,
        times: Times::floored(accessed, modified),
        size: (kind == EntryKind::File).then(|| metadata.len()),
    }
}

impl Endpoint for LocalEndpoint {
    fn paths(&self) -> PathStyle {
        self.paths
    }

    fn stat(&mut self, path: &str) -> Result<StatRecord, EndpointError> {
        let metadata =
            fs::symlink_metadata(path).map_err(|error| EndpointError::from_io(path, error))?;
        Ok(record_from_metadata(&metadata))
    }

    fn list_children(&mut self, path: &str) -> Result<Vec<(String, StatRecord)>, EndpointError> {
        let entries = fs::read_dir(path).map_err(|error| EndpointError::from_io(path, error))?;
        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|error| EndpointError::from_io(path, error))?;
            let name = entry.file_name().into_string().map_err(|name| {
                EndpointError::InvalidName {
                    path: self.paths.join(path, &name.to_string_lossy()),
                }
            })?;
            let child = self.paths.join(path, &name);
            let record = self.stat(&child)?;
            children.push((name, record));
        }
        Ok(children)
    }

    fn resolve_symlink(&mut self, path: &str) -> Result<String, EndpointError> {
        let resolved =
            fs::canonicalize(path).map_err(|error| EndpointError::from_io(path, error))?;
        resolved
            .into_os_string()
            .into_string()
            .map_err(|resolved| EndpointError::InvalidName {
                path: resolved.to_string_lossy().into_owned(),
            })
    }

    fn remove_file(&mut self, path: &str) -> Result<(), EndpointError> {
        fs::remove_file(path).map_err(|error| EndpointError::from_io(path, error))
    }

    fn remove_dir_all(&mut self, path: &str) -> Result<(), EndpointError> {
        fs::remove_dir_all(path).map_err(|error| EndpointError::from_io(path, error))
    }

    fn create_dir_all(&mut self, path: &str) -> Result<(), EndpointError> {
        fs::create_dir_all(path).map_err(|error| EndpointError::from_io(path, error))
    }

    fn set_times(&mut self, path: &str, times: Times) -> Result<(), EndpointError> {
        filetime::set_file_times(
            path,
            FileTime::from_unix_time(times.accessed, 0),
            FileTime::from_unix_time(times.modified, 0),
        )
        .map_err(|error| EndpointError::from_io(path, error))
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
