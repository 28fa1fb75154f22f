#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` supplies the reporting collaborator that every stage of a sync
//! run writes its diagnostics to. Instead of a process-wide root logger, the
//! snapshot builder, the reconciler and the executor receive a
//! `&dyn` [`Reporter`] and emit leveled messages through it. Binaries plug in
//! [`TracingReporter`], which forwards every message to the [`tracing`]
//! facade; tests plug in [`RecordingReporter`] and assert on the captured
//! lines.
//!
//! # Design
//!
//! - [`Reporter`] has a single required method, [`Reporter::log`]. The
//!   `debug`/`info`/`warn`/`error` helpers are provided on top of it.
//! - [`Verbosity`] maps the `-v`/`-q` counters accepted by the command line to
//!   a [`tracing::level_filters::LevelFilter`].
//! - With the `subscriber` feature enabled, [`init_tracing`] installs a
//!   `tracing-subscriber` formatter honouring the verbosity, colour choice and
//!   the `RUST_LOG` environment variable.
//!
//! # Examples
//!
//! ```
//! use logging::{RecordingReporter, Reporter};
//! use tracing::Level;
//!
//! let reporter = RecordingReporter::new();
//! reporter.warn(format_args!("Ignoring symlink {}", "/data/link"));
//!
//! assert_eq!(
//!     reporter.messages(),
//!     vec![(Level::WARN, "Ignoring symlink /data/link".to_owned())]
//! );
//! ```

mod reporter;
mod verbosity;

#[cfg(feature = "subscriber")]
mod subscriber;

pub use reporter::{RecordingReporter, Reporter, TracingReporter};
pub use verbosity::Verbosity;

#[cfg(feature = "subscriber")]
pub use subscriber::{SubscriberError, init_tracing};

pub use tracing::Level;
