//! crates/runner/src/paths.rs
//! Root path preparation: rsync-style destination fixing and exclude rooting.

use endpoint::{Endpoint, EndpointError, EntryKind, PathStyle};

use crate::RunError;

/// Applies rsync's trailing-separator rule to `destination_path`.
///
/// When the destination is an existing directory and the source is either a
/// regular file or a directory named without a trailing separator, the
/// source's last component is appended to the destination. A missing source
/// or destination leaves the path unchanged.
///
/// # Errors
///
/// [`RunError::DestinationIsSymlink`] when the destination is a symlink, and
/// the endpoint error for any stat failure other than `NotFound`.
pub fn fix_destination(
    source: &mut dyn Endpoint,
    source_path: &str,
    destination: &mut dyn Endpoint,
    destination_path: &str,
) -> Result<String, RunError> {
    let unchanged = || destination_path.to_owned();

    let destination_record = match destination.stat(destination_path) {
        Ok(record) => record,
        Err(EndpointError::NotFound { .. }) => return Ok(unchanged()),
        Err(error) => return Err(error.into()),
    };
    match destination_record.kind {
        EntryKind::Symlink => {
            return Err(RunError::DestinationIsSymlink {
                path: destination_path.to_owned(),
            });
        }
        EntryKind::Directory => {}
        EntryKind::File | EntryKind::Other => return Ok(unchanged()),
    }

    let source_record = match source.stat(source_path) {
        Ok(record) => record,
        Err(EndpointError::NotFound { .. }) => return Ok(unchanged()),
        Err(error) => return Err(error.into()),
    };
    let descend = match source_record.kind {
        EntryKind::File => true,
        EntryKind::Directory => !names_contents(source_path),
        EntryKind::Symlink | EntryKind::Other => false,
    };
    if !descend {
        return Ok(unchanged());
    }

    let paths = destination.paths();
    Ok(paths.join(destination_path, &paths.file_name(source_path)))
}

/// A source ending in `/` or `\\` names the directory's contents. Both
/// characters count on every host, whatever the endpoint's separator.
fn names_contents(source_path: &str) -> bool {
    source_path.ends_with(['/', '\\'])
}

/// Makes exclude patterns absolute against the destination root.
///
/// Patterns are joined onto the root when the source is a directory and
/// appended verbatim when it is a single file, then normalised.
#[must_use]
pub fn root_patterns(
    patterns: &[String],
    destination_root: &str,
    paths: PathStyle,
    source_is_directory: bool,
) -> Vec<String> {
    patterns
        .iter()
        .map(|pattern| {
            let rooted = if source_is_directory {
                paths.join(destination_root, pattern)
            } else {
                format!("{destination_root}{pattern}")
            };
            paths.normalize(&rooted)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSIX: PathStyle = PathStyle::posix();

    #[test]
    fn either_trailing_separator_names_directory_contents() {
        assert!(names_contents("/sdcard/DCIM/"));
        assert!(names_contents(r"/sdcard/DCIM\"));
        assert!(names_contents(r"C:\Users\me\Music\"));
        assert!(!names_contents("/sdcard/DCIM"));
        assert!(!names_contents(""));
    }

    #[test]
    fn patterns_are_joined_under_a_directory_source() {
        let patterns = vec!["*.tmp".to_owned(), "cache/".to_owned(), "./a//b".to_owned()];
        assert_eq!(
            root_patterns(&patterns, "/sdcard/Music", POSIX, true),
            vec!["/sdcard/Music/*.tmp", "/sdcard/Music/cache", "/sdcard/Music/a/b"]
        );
    }

    #[test]
    fn patterns_are_appended_for_a_file_source() {
        let patterns = vec![".bak".to_owned()];
        assert_eq!(
            root_patterns(&patterns, "/sdcard/notes.txt", POSIX, false),
            vec!["/sdcard/notes.txt.bak"]
        );
    }

    #[test]
    fn absolute_patterns_replace_the_root() {
        let patterns = vec!["/data/local/tmp/x".to_owned()];
        assert_eq!(
            root_patterns(&patterns, "/sdcard", POSIX, true),
            vec!["/data/local/tmp/x"]
        );
    }
}
