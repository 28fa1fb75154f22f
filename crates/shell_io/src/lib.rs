#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `shell_io` owns everything adbsync knows about talking to a device through
//! `adb`: building the `adb` command lines, driving one persistent
//! `adb shell` session, recognising the text that toybox `ls`, `realpath` and
//! the adb daemon print, and running the separate `adb push`/`adb pull`
//! processes used for bulk file content.
//!
//! # Design
//!
//! - [`AdbCommand`] collects the adb binary plus its global flags and options
//!   and derives the shell session and transfer invocations from them.
//! - [`ShellSession`] spawns the shell with standard error folded into
//!   standard output. Each logical command is written as
//!   `<quoted argv> </dev/null`, followed by an `echo` of
//!   [`END_OF_COMMAND`]; output lines are collected until that marker comes
//!   back. [`ShellChannel`] abstracts the request/response shape so callers
//!   can be exercised against scripted replies.
//! - [`listing`] holds the long-listing grammar and the error-text
//!   classifiers. [`stamp`] converts between listing timestamps, Unix
//!   seconds and `touch -t` stamps.
//! - [`TransferCommand`] runs one push or pull and turns a nonzero exit status
//!   into [`ShellError::TransferFailed`].
//!
//! # Invariants
//!
//! - Commands never read from the session's standard input; every command is
//!   redirected from `/dev/null` so an interactive prompt cannot swallow the
//!   next request.
//! - At most one command is in flight per session; [`ShellChannel::run`]
//!   takes `&mut self`.
//! - The session's standard input is closed and the child is waited for
//!   exactly once, either by [`ShellSession::close`] or on drop.
//!
//! # Errors
//!
//! [`ShellError`] covers spawn failures, I/O on the pipes, a shell that exits
//! before echoing the end-of-command marker, failed transfers and unknown
//! text encodings. Listing text that cannot be classified is reported by
//! [`listing::ListingError`].

mod command;
mod error;
pub mod listing;
mod quote;
mod session;
pub mod stamp;
mod transfer;

pub use command::AdbCommand;
pub use encoding_rs::Encoding;
pub use error::ShellError;
pub use quote::{join_argv, shell_quote};
pub use session::{END_OF_COMMAND, ShellChannel, ShellSession, encoding_for_label};
pub use transfer::TransferCommand;
