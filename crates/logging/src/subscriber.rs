//! crates/logging/src/subscriber.rs
//! Global `tracing-subscriber` installation for the binary.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::Verbosity;

/// Error returned when a global subscriber is already installed.
#[derive(Debug, thiserror::Error)]
#[error("failed to install log subscriber: {0}")]
pub struct SubscriberError(#[source] Box<dyn std::error::Error + Send + Sync + 'static>);

/// Installs the process-wide formatter writing to standard error.
///
/// `RUST_LOG` takes precedence over `verbosity` when set. ANSI colours are
/// used only when `no_color` is false and standard error is a terminal. Debug
/// runs include the source location of each event.
pub fn init_tracing(verbosity: Verbosity, no_color: bool) -> Result<(), SubscriberError> {
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.level_filter().into())
        .from_env_lossy();
    let ansi = !no_color && io::stderr().is_terminal();
    let verbose = verbosity.is_verbose();

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .with_level(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .without_time()
        .try_init()
        .map_err(SubscriberError)
}
