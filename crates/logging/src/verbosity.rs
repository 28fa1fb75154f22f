//! crates/logging/src/verbosity.rs
//! Mapping from `-v`/`-q` counters to a tracing level filter.

use tracing::level_filters::LevelFilter;

/// Verbosity requested on the command line.
///
/// The default threshold is INFO. Each `-v` lowers it by one level and each
/// `-q` raises it by one level; raising past ERROR disables output entirely
/// once the quiet count reaches four.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Verbosity {
    /// Number of `-v` occurrences.
    pub verbose: u8,
    /// Number of `-q` occurrences.
    pub quiet: u8,
}

impl Verbosity {
    /// Creates a verbosity from the two counters.
    #[must_use]
    pub const fn new(verbose: u8, quiet: u8) -> Self {
        Self { verbose, quiet }
    }

    /// Returns the most verbose level that should be emitted.
    #[must_use]
    pub fn level_filter(self) -> LevelFilter {
        let score = 2_i16 + i16::from(self.quiet) - i16::from(self.verbose);
        match score {
            i16::MIN..=0 => LevelFilter::TRACE,
            1 => LevelFilter::DEBUG,
            2 => LevelFilter::INFO,
            3 => LevelFilter::WARN,
            4 | 5 => LevelFilter::ERROR,
            _ => LevelFilter::OFF,
        }
    }

    /// Returns `true` when debug output is enabled.
    #[must_use]
    pub fn is_verbose(self) -> bool {
        self.level_filter() >= LevelFilter::DEBUG
    }
}
