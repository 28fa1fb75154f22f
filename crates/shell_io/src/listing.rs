//! Grammar for toybox long listings and classifiers for shell error text.
//!
//! A long-listing line is a type character, three permission triplets, an
//! optional hard-link count, owner, group, then a kind-specific middle
//! section (device numbers, directory size, file size or link length), a
//! `YYYY-MM-DD HH:MM` timestamp and the name. Anything that is neither a
//! known error message nor a well-formed listing line is reported as
//! [`ListingError::Unrecognized`]; callers treat that as a broken channel.

use std::sync::LazyLock;

use regex::Regex;
use time::PrimitiveDateTime;
use time::macros::format_description;

/// File type announced by the first character of a listing line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListingKind {
    /// `-`
    Regular,
    /// `d`
    Directory,
    /// `l`
    Symlink,
    /// `b`
    BlockDevice,
    /// `c`
    CharDevice,
    /// `p`
    Fifo,
    /// `s`
    Socket,
}

/// One parsed long-listing line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListingLine {
    /// Entry type.
    pub kind: ListingKind,
    /// Byte size, reported for regular files only.
    pub size: Option<u64>,
    /// Modification time, minute precision, in the device's local time.
    pub modified: PrimitiveDateTime,
    /// Entry name as printed. For symlinks this is the text before ` -> `.
    pub name: String,
}

/// Shell output that is not a listing entry.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ListingError {
    /// The shell reported a missing path.
    #[error("no such file or directory: {0}")]
    NotFound(String),
    /// A path component was not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(String),
    /// The shell was not allowed to inspect the path.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// The line matched neither an error pattern nor the grammar.
    #[error("unrecognized shell output: {0}")]
    Unrecognized(String),
}

const PERMISSIONS: &str = "[-r][-w][-xsS][-r][-w][-xsS][-r][-w][-xtT]";
const OWNERSHIP: &str = " +(?:[0-9]+ +)?[^ ]+ +[^ ]+ +";
const TIMESTAMP: &str = "(?P<mtime>[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2})";

fn listing_regex(kind: char, middle: &str) -> Regex {
    let pattern = format!(
        "^{}{PERMISSIONS}{OWNERSHIP}{middle}{TIMESTAMP} (?P<name>.*)$",
        regex::escape(&kind.to_string())
    );
    Regex::new(&pattern).expect("listing grammar is a valid regex")
}

static REGULAR: LazyLock<Regex> = LazyLock::new(|| listing_regex('-', "(?P<size>[0-9]+) +"));
static DIRECTORY: LazyLock<Regex> = LazyLock::new(|| listing_regex('d', "(?:[0-9]+ +)?"));
static SYMLINK: LazyLock<Regex> = LazyLock::new(|| listing_regex('l', "[0-9]+ +"));
static BLOCK: LazyLock<Regex> = LazyLock::new(|| listing_regex('b', "[^ ]+ +[^ ]+ +"));
static CHAR: LazyLock<Regex> = LazyLock::new(|| listing_regex('c', "[^ ]+ +[^ ]+ +"));
static FIFO: LazyLock<Regex> = LazyLock::new(|| listing_regex('p', ""));
static SOCKET: LazyLock<Regex> = LazyLock::new(|| listing_regex('s', ""));

static NO_SUCH_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^.*: No such file or directory$").expect("valid regex"));
static LS_NOT_A_DIRECTORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^ls: .*: Not a directory$").expect("valid regex"));
static PERMISSION_DENIED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^.*: Permission denied$").expect("valid regex"));
static TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^total [0-9]+$").expect("valid regex"));

static REALPATH_NO_SUCH_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^realpath: .*: No such file or directory$").expect("valid regex")
});
static REALPATH_NOT_A_DIRECTORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^realpath: .*: Not a directory$").expect("valid regex"));

static DAEMON_NOT_RUNNING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\* daemon not running; starting now at tcp:[0-9]+$").expect("valid regex")
});
static DAEMON_STARTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\* daemon started successfully$").expect("valid regex"));

/// Parses one line of `ls -la` / `ls -lad` output.
pub fn parse_line(line: &str) -> Result<ListingLine, ListingError> {
    if NO_SUCH_FILE.is_match(line) {
        return Err(ListingError::NotFound(line.to_owned()));
    }
    if LS_NOT_A_DIRECTORY.is_match(line) {
        return Err(ListingError::NotADirectory(line.to_owned()));
    }
    if PERMISSION_DENIED.is_match(line) {
        return Err(ListingError::PermissionDenied(line.to_owned()));
    }

    let unrecognized = || ListingError::Unrecognized(line.to_owned());
    let (kind, grammar): (ListingKind, &Regex) = match line.chars().next() {
        Some('-') => (ListingKind::Regular, &REGULAR),
        Some('d') => (ListingKind::Directory, &DIRECTORY),
        Some('l') => (ListingKind::Symlink, &SYMLINK),
        Some('b') => (ListingKind::BlockDevice, &BLOCK),
        Some('c') => (ListingKind::CharDevice, &CHAR),
        Some('p') => (ListingKind::Fifo, &FIFO),
        Some('s') => (ListingKind::Socket, &SOCKET),
        _ => return Err(unrecognized()),
    };

    let captures = grammar.captures(line).ok_or_else(unrecognized)?;
    let modified = PrimitiveDateTime::parse(
        &captures["mtime"],
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
    )
    .map_err(|_| unrecognized())?;
    let size = match captures.name("size") {
        Some(size) => Some(size.as_str().parse::<u64>().map_err(|_| unrecognized())?),
        None => None,
    };
    let raw_name = &captures["name"];
    let name = match kind {
        ListingKind::Symlink => raw_name
            .split_once(" -> ")
            .map_or(raw_name, |(name, _target)| name),
        _ => raw_name,
    };

    Ok(ListingLine {
        kind,
        size,
        modified,
        name: name.to_owned(),
    })
}

/// Returns `true` for the `total N` line that precedes a directory listing.
pub fn is_total_line(line: &str) -> bool {
    TOTAL.is_match(line)
}

/// Classifies one line of `realpath` output, returning the resolved path.
pub fn parse_realpath(line: &str) -> Result<&str, ListingError> {
    if REALPATH_NO_SUCH_FILE.is_match(line) {
        Err(ListingError::NotFound(line.to_owned()))
    } else if REALPATH_NOT_A_DIRECTORY.is_match(line) {
        Err(ListingError::NotADirectory(line.to_owned()))
    } else {
        Ok(line)
    }
}

/// Returns `true` for the chatter adb prints while starting its server.
pub fn is_daemon_chatter(line: &str) -> bool {
    DAEMON_NOT_RUNNING.is_match(line) || DAEMON_STARTED.is_match(line)
}
