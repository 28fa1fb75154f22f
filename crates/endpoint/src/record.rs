/// Kind of filesystem entry as seen without following symlinks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
    /// Device, fifo, socket or anything else that cannot be synchronised.
    Other,
}

/// Access and modification time pair in whole seconds since the Unix epoch.
///
/// Values produced by endpoints are floored to the minute, see
/// [`floor_to_minute`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Times {
    /// Last access time.
    pub accessed: i64,
    /// Last modification time.
    pub modified: i64,
}

impl Times {
    /// Creates a pair from raw seconds, flooring both to the minute.
    #[must_use]
    pub const fn floored(accessed: i64, modified: i64) -> Self {
        Self {
            accessed: floor_to_minute(accessed),
            modified: floor_to_minute(modified),
        }
    }
}

/// Result of a metadata query on an endpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatRecord {
    /// Entry kind.
    pub kind: EntryKind,
    /// Minute-resolution timestamps.
    pub times: Times,
    /// Byte size when the endpoint reports one.
    pub size: Option<u64>,
}

/// Rounds `seconds` down to a whole minute, also for instants before 1970.
#[must_use]
pub const fn floor_to_minute(seconds: i64) -> i64 {
    seconds.div_euclid(60) * 60
}
