#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` decides and performs a sync. The [`Reconciler`] compares a source
//! and a destination [`flist::Tree`] and partitions every path into five
//! trees: delete, copy, excluded source, unaccounted destination and excluded
//! destination. The [`hygiene`] helpers tidy those trees, and the
//! [`Executor`] applies the resulting [`SyncPlan`] to the destination
//! endpoint.
//!
//! # Design
//!
//! - The diff is a single recursive function returning a [`DiffOutcome`];
//!   it never touches an endpoint.
//! - One exclude match on a destination path decides all five outcomes for
//!   that path and everything below it.
//! - Execution is strictly ordered: delete tree, then what the
//!   [`DeletionPolicy`] selects, then the copy tree.
//!
//! # Invariants
//!
//! - A destination file is replaced only when the source modification time
//!   is strictly newer. Access times never influence the decision.
//! - Excluded paths never appear in the delete or copy tree.
//! - Deleting unaccounted content without deleting excluded content never
//!   removes a directory that still holds excluded content.
//!
//! # Errors
//!
//! [`EngineError::OverwriteRefused`] stops a diff at the first file/directory
//! conflict unless overwriting is allowed. During execution the first
//! [`endpoint::EndpointError`] aborts the run.
//!
//! # Examples
//!
//! ```
//! use endpoint::PathStyle;
//! use engine::{Reconciler, hygiene};
//! use filters::ExcludeSet;
//! use flist::{Branch, Tree};
//! use logging::RecordingReporter;
//!
//! let source = Tree::from(Branch::from_parts(None, [("new.txt", Tree::leaf(0, 120))]));
//! let destination = Tree::from(Branch::from_parts(None, [("old.txt", Tree::leaf(0, 60))]));
//!
//! let excludes = ExcludeSet::empty();
//! let reporter = RecordingReporter::new();
//! let outcome = Reconciler::new(&excludes, &reporter)
//!     .path_styles(PathStyle::posix(), PathStyle::posix())
//!     .diff(&source, &destination, "/src", "/dst")
//!     .unwrap();
//!
//! assert!(hygiene::tidy(outcome.copy).descendant(["new.txt"]).is_some());
//! assert!(hygiene::tidy(outcome.unaccounted_destination).descendant(["old.txt"]).is_some());
//! ```

mod diff;
mod error;
mod executor;
pub mod hygiene;

pub use crate::diff::{DiffOutcome, Reconciler};
pub use crate::error::{Conflict, EngineError, EngineResult};
pub use crate::executor::{DeletionPolicy, Executor, SyncPlan};
