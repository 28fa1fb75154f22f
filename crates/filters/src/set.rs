use std::fs;
use std::path::Path;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::FilterError;

/// Compiled, immutable collection of exclude patterns.
#[derive(Clone, Debug)]
pub struct ExcludeSet {
    patterns: Vec<String>,
    matcher: GlobSet,
}

impl ExcludeSet {
    /// Compiles `patterns` into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPattern`] for the first pattern that is
    /// not a valid glob.
    pub fn new<I, S>(patterns: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(false)
                .backslash_escape(false)
                .case_insensitive(cfg!(windows))
                .build()
                .map_err(|source| FilterError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }
        let matcher = builder
            .build()
            .map_err(|source| FilterError::InvalidPattern {
                pattern: patterns.join(" "),
                source,
            })?;

        Ok(Self { patterns, matcher })
    }

    /// Returns a set that excludes nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            matcher: GlobSet::empty(),
        }
    }

    /// Returns `true` when `path` matches at least one pattern.
    #[must_use]
    pub fn is_excluded(&self, path: &str) -> bool {
        !self.patterns.is_empty() && self.matcher.is_match(path)
    }

    /// Returns the pattern text in definition order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns `true` if the set holds no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for ExcludeSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Reads exclude patterns from `path`, one per line.
///
/// Empty lines are skipped; every other line is taken verbatim, including
/// surrounding whitespace.
///
/// # Errors
///
/// Returns [`FilterError::Read`] when the file cannot be read as UTF-8 text.
pub fn read_patterns(path: &Path) -> Result<Vec<String>, FilterError> {
    let contents = fs::read_to_string(path).map_err(|source| FilterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(contents
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}
