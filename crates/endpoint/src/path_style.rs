//! Lexical path algebra shared by endpoints and the reconciler.
//!
//! Paths are handled as text. No operation here touches a filesystem, which
//! lets the diff walk compute destination paths for exclude matching without
//! an endpoint at hand.

/// Separator rules for one kind of endpoint.
///
/// Every result is expressed with the primary separator; an alternate
/// separator, when configured, is accepted on input and rewritten.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PathStyle {
    separator: char,
    alternate: Option<char>,
}

impl PathStyle {
    /// Strict POSIX rules: `/` only, backslashes are ordinary characters.
    #[must_use]
    pub const fn posix() -> Self {
        Self {
            separator: '/',
            alternate: None,
        }
    }

    /// Rules for device paths.
    ///
    /// Device paths always use `/`. On Windows hosts, backslashes produced by
    /// host-side path handling are also treated as separators and rewritten.
    #[must_use]
    pub const fn remote() -> Self {
        Self {
            separator: '/',
            alternate: if cfg!(windows) { Some('\\') } else { None },
        }
    }

    /// Rules for paths on the machine running adbsync.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(windows) {
            Self {
                separator: '\\',
                alternate: Some('/'),
            }
        } else {
            Self::posix()
        }
    }

    /// Primary separator.
    #[must_use]
    pub const fn separator(self) -> char {
        self.separator
    }

    fn is_separator(self, c: char) -> bool {
        c == self.separator || Some(c) == self.alternate
    }

    fn canonical(self, path: &str) -> String {
        match self.alternate {
            Some(alternate) => path.replace(alternate, &self.separator.to_string()),
            None => path.to_owned(),
        }
    }

    /// Returns `true` when `path` ends with a separator.
    #[must_use]
    pub fn has_trailing_separator(self, path: &str) -> bool {
        path.chars().next_back().is_some_and(|c| self.is_separator(c))
    }

    /// Appends `name` to `base`.
    ///
    /// An absolute `name` replaces `base`; no separator is inserted when
    /// `base` is empty or already ends with one.
    #[must_use]
    pub fn join(self, base: &str, name: &str) -> String {
        if name.chars().next().is_some_and(|c| self.is_separator(c)) {
            return self.canonical(name);
        }
        let mut joined = String::with_capacity(base.len() + name.len() + 1);
        joined.push_str(base);
        if !base.is_empty() && !self.has_trailing_separator(base) {
            joined.push(self.separator);
        }
        joined.push_str(name);
        self.canonical(&joined)
    }

    /// Splits `path` into its parent and its last component.
    ///
    /// Follows `dirname`/`basename` splitting: `/a/b` gives `("/a", "b")`,
    /// `a/` gives `("a", "")` and `b` gives `("", "b")`.
    #[must_use]
    pub fn split(self, path: &str) -> (String, String) {
        let Some((index, separator)) = path
            .char_indices()
            .rev()
            .find(|&(_, c)| self.is_separator(c))
        else {
            return (String::new(), path.to_owned());
        };

        let tail = &path[index + separator.len_utf8()..];
        let head = &path[..index + separator.len_utf8()];
        let trimmed = head.trim_end_matches(|c| self.is_separator(c));
        let head = if trimmed.is_empty() { head } else { trimmed };
        (self.canonical(head), tail.to_owned())
    }

    /// Returns the last component of `path`, see [`PathStyle::split`].
    #[must_use]
    pub fn file_name(self, path: &str) -> String {
        self.split(path).1
    }

    /// Lexically normalises `path`.
    ///
    /// Duplicate separators and `.` segments disappear, `..` consumes the
    /// preceding segment (and is dropped at the root of an absolute path),
    /// and an empty result becomes `.`.
    #[must_use]
    pub fn normalize(self, path: &str) -> String {
        let absolute = path.chars().next().is_some_and(|c| self.is_separator(c));
        let mut segments: Vec<&str> = Vec::new();
        for segment in path.split(|c| self.is_separator(c)) {
            match segment {
                "" | "." => {}
                ".." => match segments.last() {
                    Some(&last) if last != ".." => {
                        segments.pop();
                    }
                    _ if absolute => {}
                    _ => segments.push(".."),
                },
                other => segments.push(other),
            }
        }

        let separator = self.separator.to_string();
        let body = segments.join(&separator);
        match (absolute, body.is_empty()) {
            (true, _) => format!("{separator}{body}"),
            (false, true) => ".".to_owned(),
            (false, false) => body,
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::native()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSIX: PathStyle = PathStyle::posix();
    const BACKSLASH_TOLERANT: PathStyle = PathStyle {
        separator: '/',
        alternate: Some('\\'),
    };

    #[test]
    fn join_inserts_single_separator() {
        assert_eq!(POSIX.join("/sdcard", "DCIM"), "/sdcard/DCIM");
        assert_eq!(POSIX.join("/sdcard/", "DCIM"), "/sdcard/DCIM");
        assert_eq!(POSIX.join("", "DCIM"), "DCIM");
        assert_eq!(POSIX.join(".", "a"), "./a");
    }

    #[test]
    fn join_with_absolute_name_replaces_base() {
        assert_eq!(POSIX.join("/sdcard", "/data"), "/data");
    }

    #[test]
    fn split_follows_dirname_and_basename() {
        assert_eq!(POSIX.split("/a/b"), ("/a".to_owned(), "b".to_owned()));
        assert_eq!(POSIX.split("a/"), ("a".to_owned(), String::new()));
        assert_eq!(POSIX.split("/a"), ("/".to_owned(), "a".to_owned()));
        assert_eq!(POSIX.split("b"), (String::new(), "b".to_owned()));
        assert_eq!(POSIX.split("a//b"), ("a".to_owned(), "b".to_owned()));
        assert_eq!(POSIX.split("//b"), ("//".to_owned(), "b".to_owned()));
    }

    #[test]
    fn normalize_collapses_and_resolves() {
        assert_eq!(POSIX.normalize(""), ".");
        assert_eq!(POSIX.normalize("."), ".");
        assert_eq!(POSIX.normalize("a//b/./c/"), "a/b/c");
        assert_eq!(POSIX.normalize("/a/b/../c"), "/a/c");
        assert_eq!(POSIX.normalize("/.."), "/");
        assert_eq!(POSIX.normalize("../a/../.."), "../..");
        assert_eq!(POSIX.normalize("a/.."), ".");
        assert_eq!(POSIX.normalize("///sdcard"), "/sdcard");
    }

    #[test]
    fn posix_keeps_backslashes_as_name_characters() {
        assert_eq!(POSIX.join("/sdcard", "a\\b"), "/sdcard/a\\b");
        assert_eq!(POSIX.split("/x/a\\b"), ("/x".to_owned(), "a\\b".to_owned()));
    }

    #[test]
    fn alternate_separator_is_canonicalised() {
        assert_eq!(BACKSLASH_TOLERANT.join("/sdcard\\Music", "a"), "/sdcard/Music/a");
        assert_eq!(
            BACKSLASH_TOLERANT.split("C:\\Users\\me\\song.mp3"),
            ("C:/Users/me".to_owned(), "song.mp3".to_owned())
        );
        assert_eq!(BACKSLASH_TOLERANT.normalize("/sdcard\\.\\Music\\"), "/sdcard/Music");
        assert!(BACKSLASH_TOLERANT.has_trailing_separator("photos\\"));
    }

    #[test]
    fn trailing_separator_detection() {
        assert!(POSIX.has_trailing_separator("/sdcard/"));
        assert!(!POSIX.has_trailing_separator("/sdcard"));
        assert!(!POSIX.has_trailing_separator(""));
    }

    #[test]
    fn file_name_is_last_component() {
        assert_eq!(POSIX.file_name("/sdcard/DCIM/x.jpg"), "x.jpg");
        assert_eq!(POSIX.file_name("x.jpg"), "x.jpg");
    }
}
