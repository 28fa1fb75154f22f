#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` compiles the user's exclude patterns into a single matcher and
//! answers one question for the reconciler: is this destination path
//! excluded? Patterns follow `fnmatch(3)` conventions as used by shells when
//! matching whole strings: `*` and `?` also match the path separator, and
//! bracket classes such as `[0-9]` and `[!a]` are supported.
//!
//! # Design
//!
//! - [`ExcludeSet`] owns the pattern text together with a compiled
//!   [`globset::GlobSet`]. Matching is evaluated against complete paths; the
//!   caller is responsible for rooting patterns at the destination first.
//! - [`read_patterns`] loads an exclude file, one pattern per non-empty line.
//!
//! # Invariants
//!
//! - An empty set excludes nothing.
//! - A path is excluded when at least one pattern matches it; pattern order
//!   is irrelevant.
//! - Matching is case-insensitive on Windows and case-sensitive elsewhere,
//!   mirroring how the platform's own `fnmatch` normalises case.
//!
//! # Errors
//!
//! [`ExcludeSet::new`] reports [`FilterError::InvalidPattern`] when a pattern
//! is not a valid glob; [`read_patterns`] reports [`FilterError::Read`] when
//! the exclude file cannot be read.
//!
//! # Examples
//!
//! ```
//! use filters::ExcludeSet;
//!
//! let excludes = ExcludeSet::new(["/sdcard/Music/*.tmp", "/sdcard/Music/cache"]).unwrap();
//!
//! assert!(excludes.is_excluded("/sdcard/Music/a.tmp"));
//! assert!(excludes.is_excluded("/sdcard/Music/album/b.tmp"));
//! assert!(excludes.is_excluded("/sdcard/Music/cache"));
//! assert!(!excludes.is_excluded("/sdcard/Music/cache/song.mp3"));
//! ```

mod error;
mod set;

pub use error::FilterError;
pub use set::{ExcludeSet, read_patterns};
