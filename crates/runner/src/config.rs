//! Caller-facing description of one sync.

/// Which way content flows.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Direction {
    /// Local machine to device.
    #[default]
    Push,
    /// Device to local machine.
    Pull,
}

/// Everything a run needs to know apart from how to reach the device.
///
/// Paths are kept exactly as the user typed them; a trailing separator on
/// the source is meaningful.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyncOptions {
    /// Transfer direction.
    pub direction: Direction,
    /// Path on the local machine.
    pub local_path: String,
    /// Path on the device.
    pub android_path: String,
    /// Report every action without mutating the destination.
    pub dry_run: bool,
    /// Follow symlinks instead of skipping them.
    pub copy_links: bool,
    /// Exclude patterns relative to the destination root.
    pub excludes: Vec<String>,
    /// Delete unaccounted destination content.
    pub delete: bool,
    /// Delete excluded destination content.
    pub delete_excluded: bool,
    /// Replace files by directories and vice versa.
    pub force: bool,
    /// Let the transfer program print its own progress.
    pub show_progress: bool,
}

impl SyncOptions {
    /// Creates options for a sync between `local_path` and `android_path`.
    #[must_use]
    pub fn new(
        direction: Direction,
        local_path: impl Into<String>,
        android_path: impl Into<String>,
    ) -> Self {
        Self {
            direction,
            local_path: local_path.into(),
            android_path: android_path.into(),
            ..Self::default()
        }
    }

    /// Path content is read from.
    #[must_use]
    pub fn source_path(&self) -> &str {
        match self.direction {
            Direction::Push => &self.local_path,
            Direction::Pull => &self.android_path,
        }
    }

    /// Path content is written to.
    #[must_use]
    pub fn destination_path(&self) -> &str {
        match self.direction {
            Direction::Push => &self.android_path,
            Direction::Pull => &self.local_path,
        }
    }

    /// Whether type conflicts abort the diff. Dry runs only warn.
    #[must_use]
    pub const fn refuse_overwrite(&self) -> bool {
        !self.dry_run && !self.force
    }
}
