#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `runner` strings the workspace together into one sync run. It opens the
//! device session, fixes up the root paths the way rsync does, snapshots
//! both sides, reconciles them and finally executes the resulting plan.
//!
//! # Design
//!
//! - [`SyncOptions`] carries the caller's choices; [`DeviceSession`] owns the
//!   two endpoints of a device sync.
//! - [`prepare`] returns a [`SyncReport`] holding both snapshots and every
//!   diff tree, so the front-end can render them before [`execute`] touches
//!   anything.
//! - [`prepare`] and [`execute`] work on `&mut dyn Endpoint`, which lets the
//!   whole run be exercised against two local directories.
//!
//! # Errors
//!
//! Every failure is a [`RunError`] and maps onto an [`ExitCode`] through
//! [`RunError::exit_code`].
//!
//! # Examples
//!
//! ```
//! use runner::{Direction, SyncOptions, execute, prepare};
//! use endpoint::LocalEndpoint;
//! use logging::RecordingReporter;
//! use shell_io::TransferCommand;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! std::fs::create_dir(temp.path().join("from"))?;
//! std::fs::write(temp.path().join("from").join("song.mp3"), b"...")?;
//! let from = temp.path().join("from");
//! let to = temp.path().join("to");
//!
//! let options = SyncOptions::new(
//!     Direction::Push,
//!     from.to_str().ok_or("non UTF-8")?,
//!     to.to_str().ok_or("non UTF-8")?,
//! );
//! let mut source = LocalEndpoint::new(TransferCommand::new("cp", Vec::new()));
//! let mut destination = LocalEndpoint::new(TransferCommand::new("cp", Vec::new()));
//! let reporter = RecordingReporter::new();
//!
//! let report = prepare(&options, &mut source, &mut destination, &reporter)?;
//! execute(&report, &options, &source, &mut destination, &reporter)?;
//! assert!(to.join("song.mp3").exists());
//! # Ok(())
//! # }
//! # #[cfg(unix)]
//! # demo().unwrap();
//! ```

mod config;
mod error;
mod exit_code;
mod paths;
mod session;
mod sync;

pub use crate::config::{Direction, SyncOptions};
pub use crate::error::RunError;
pub use crate::exit_code::ExitCode;
pub use crate::paths::{fix_destination, root_patterns};
pub use crate::session::DeviceSession;
pub use crate::sync::{SyncReport, execute, prepare};
