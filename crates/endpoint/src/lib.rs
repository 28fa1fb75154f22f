#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `endpoint` puts the two sides of a synchronisation behind one capability
//! trait. [`LocalEndpoint`] talks to the operating system directly;
//! [`RemoteShellEndpoint`] drives a device through a persistent `adb shell`
//! session and parses what toybox prints back.
//!
//! # Design
//!
//! - [`Endpoint`] is the capability set used by snapshot building and by the
//!   sync executor: metadata queries, directory listing, symlink
//!   resolution, the three mutations, timestamp restoration and pushing file
//!   content "here", into the endpoint the method is called on.
//! - [`PathStyle`] is the pure path algebra of an endpoint. It is a plain
//!   value so the reconciler can compute paths without doing any I/O.
//! - [`StatRecord`] is the normalised metadata both endpoints produce. Both
//!   floor timestamps to whole minutes so that native metadata and the
//!   minute-precision listing text compare meaningfully.
//!
//! # Invariants
//!
//! - `stat` never follows symlinks.
//! - `list_children` never yields `.` or `..`.
//! - All operations take `&mut self`; a remote endpoint has at most one
//!   command in flight on its shell.
//!
//! # Errors
//!
//! Every operation reports [`EndpointError`]. `NotFound`, `NotADirectory`
//! and `PermissionDenied` carry the offending path and may be recovered by
//! the caller; protocol violations, failed transfers and connectivity
//! failures are meant to end the run.
//!
//! # Examples
//!
//! ```
//! use endpoint::{Endpoint, EntryKind, LocalEndpoint};
//! use shell_io::TransferCommand;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! std::fs::write(temp.path().join("notes.txt"), b"hello")?;
//! let root = temp.path().to_str().ok_or("non UTF-8 temp dir")?;
//!
//! let mut local = LocalEndpoint::new(TransferCommand::new("cp", Vec::new()));
//! let children = local.list_children(root)?;
//! assert_eq!(children.len(), 1);
//! assert_eq!(children[0].0, "notes.txt");
//! assert_eq!(children[0].1.kind, EntryKind::File);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod error;
mod local;
mod path_style;
mod record;
mod remote;

pub use error::EndpointError;
pub use local::LocalEndpoint;
pub use path_style::PathStyle;
pub use record::{EntryKind, StatRecord, Times, floor_to_minute};
pub use remote::RemoteShellEndpoint;

/// Filesystem capabilities shared by the local machine and the device.
pub trait Endpoint {
    /// Path algebra for paths on this endpoint.
    fn paths(&self) -> PathStyle;

    /// Returns metadata for `path` without following a final symlink.
    fn stat(&mut self, path: &str) -> Result<StatRecord, EndpointError>;

    /// Lists the direct children of the directory `path` with their metadata.
    fn list_children(&mut self, path: &str) -> Result<Vec<(String, StatRecord)>, EndpointError>;

    /// Resolves every symlink along `path`.
    fn resolve_symlink(&mut self, path: &str) -> Result<String, EndpointError>;

    /// Deletes the file `path`.
    fn remove_file(&mut self, path: &str) -> Result<(), EndpointError>;

    /// Deletes the directory `path` and everything below it.
    fn remove_dir_all(&mut self, path: &str) -> Result<(), EndpointError>;

    /// Creates `path` and any missing parents.
    fn create_dir_all(&mut self, path: &str) -> Result<(), EndpointError>;

    /// Sets the access and modification times of `path`.
    fn set_times(&mut self, path: &str, times: Times) -> Result<(), EndpointError>;

    /// Copies `source`, a path on the other endpoint, to `destination` on this one.
    fn push_file(
        &mut self,
        source: &str,
        destination: &str,
        show_progress: bool,
    ) -> Result<(), EndpointError>;
}
