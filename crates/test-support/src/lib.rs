#![deny(unsafe_code)]

//! Fixture helpers shared by the integration tests of the workspace.
//!
//! [`FixtureDir`] builds throwaway directory trees whose timestamps are
//! pinned, so snapshot comparisons do not depend on when a test happens to
//! run. [`local_endpoint`] returns a [`LocalEndpoint`] whose transfer is plain
//! `cp`, letting the executor move real files without a device.

use std::fs;
use std::path::{Path, PathBuf};

use endpoint::LocalEndpoint;
use filetime::FileTime;
use shell_io::TransferCommand;
use tempfile::TempDir;

/// Reference timestamp used by fixtures, a whole minute.
pub const BASE_TIME: i64 = 1_700_000_040;

/// Temporary directory tree removed on drop.
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    /// Creates an empty fixture directory.
    ///
    /// # Panics
    ///
    /// When the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create fixture directory"),
        }
    }

    /// Absolute path of the fixture root.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the fixture, as UTF-8.
    #[must_use]
    pub fn join(&self, relative: &str) -> String {
        utf8(&self.dir.path().join(relative)).to_owned()
    }

    /// Creates `relative` and every missing parent directory.
    ///
    /// # Panics
    ///
    /// When the directory cannot be created.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(&path).expect("create fixture directory");
        path
    }

    /// Writes `contents` to `relative`, creating parents, and pins both its
    /// access and modification time to `modified`.
    ///
    /// # Panics
    ///
    /// When the file cannot be written or its times cannot be set.
    pub fn file(&self, relative: &str, contents: &[u8], modified: i64) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture parent");
        }
        fs::write(&path, contents).expect("write fixture file");
        pin_times(&path, modified, modified);
        path
    }
}

impl Default for FixtureDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Sets the access and modification time of `path`, in whole seconds.
///
/// # Panics
///
/// When the times cannot be set.
pub fn pin_times(path: &Path, accessed: i64, modified: i64) {
    filetime::set_file_times(
        path,
        FileTime::from_unix_time(accessed, 0),
        FileTime::from_unix_time(modified, 0),
    )
    .expect("pin fixture times");
}

/// Reads the modification time of `path`, in whole seconds.
///
/// # Panics
///
/// When `path` has no readable metadata.
#[must_use]
pub fn modified_time(path: &Path) -> i64 {
    let metadata = fs::metadata(path).expect("fixture metadata");
    FileTime::from_last_modification_time(&metadata).unix_seconds()
}

/// Views a temporary path as UTF-8.
///
/// # Panics
///
/// When the path is not valid UTF-8.
#[must_use]
pub fn utf8(path: &Path) -> &str {
    path.to_str().expect("fixture paths are UTF-8")
}

/// Local endpoint whose transfers are performed by `cp`.
#[must_use]
pub fn local_endpoint() -> LocalEndpoint {
    LocalEndpoint::new(TransferCommand::new("cp", Vec::new()))
}
