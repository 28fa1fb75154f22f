#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `flist` turns the contents of one endpoint into an in-memory [`Tree`].
//! Snapshots are taken once per run for the source and for the destination
//! and are read-only afterwards; the reconciler derives everything else from
//! them.
//!
//! # Design
//!
//! - [`Tree`] is a three-case sum type: [`Tree::Absent`], [`Tree::Leaf`] for
//!   regular files and [`Tree::Branch`] for directories. A [`Branch`] carries
//!   an optional self-entry with the directory's own timestamps plus its
//!   named children.
//! - [`SnapshotBuilder`] stats the root once and then descends with the
//!   metadata returned by each directory listing, so a directory costs one
//!   round-trip on a remote endpoint regardless of how many children it has.
//!
//! # Invariants
//!
//! - Snapshots never contain [`Tree::Absent`] children; skipped symlinks are
//!   simply left out.
//! - Every directory in a snapshot carries its self-entry.
//! - Following symlinks never loops: a link whose target is already being
//!   followed further up the descent is skipped.
//!
//! # Errors
//!
//! [`SnapshotError::UnsupportedEntry`] aborts the walk when a device, fifo or
//! socket is met. Endpoint failures propagate as [`SnapshotError::Endpoint`],
//! except for symlinks that cannot be resolved, which are reported through
//! the [`logging::Reporter`] and skipped.
//!
//! # Examples
//!
//! ```
//! use endpoint::LocalEndpoint;
//! use flist::{SnapshotBuilder, Tree};
//! use logging::RecordingReporter;
//! use shell_io::TransferCommand;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! std::fs::create_dir(temp.path().join("album"))?;
//! std::fs::write(temp.path().join("album").join("track.mp3"), b"...")?;
//! let root = temp.path().to_str().ok_or("non UTF-8 temp dir")?;
//!
//! let mut local = LocalEndpoint::new(TransferCommand::new("cp", Vec::new()));
//! let tree = SnapshotBuilder::new(root).build(&mut local, &RecordingReporter::new())?;
//! assert!(matches!(tree.descendant(["album", "track.mp3"]), Some(Tree::Leaf(_))));
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod error;
mod snapshot;
mod tree;

pub use crate::error::SnapshotError;
pub use crate::snapshot::SnapshotBuilder;
pub use crate::tree::{Branch, Tree};
