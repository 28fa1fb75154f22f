//! crates/flist/src/snapshot.rs
//! Builds a [`Tree`] from one endpoint.

use endpoint::{Endpoint, EndpointError, EntryKind, StatRecord};
use logging::Reporter;

use crate::{Branch, SnapshotError, Tree};

/// Configures and runs a snapshot of one endpoint path.
///
/// The root is stat-ed once; every directory below it costs exactly one
/// listing call because child metadata comes back with the listing.
#[derive(Clone, Debug)]
pub struct SnapshotBuilder {
    root: String,
    follow_symlinks: bool,
}

impl SnapshotBuilder {
    /// Creates a builder for the tree rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
        }
    }

    /// Follows symlinks instead of skipping them.
    ///
    /// A followed symlink is snapshotted as if its resolved target had been
    /// named directly. Targets that cannot be resolved or stat-ed are
    /// reported and skipped.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Walks the endpoint and returns the snapshot.
    ///
    /// A root that is a skipped symlink yields [`Tree::Absent`]. Errors from
    /// stat-ing the root are returned unchanged so the caller can decide
    /// whether a missing root is fatal.
    pub fn build(
        &self,
        endpoint: &mut dyn Endpoint,
        reporter: &dyn Reporter,
    ) -> Result<Tree, SnapshotError> {
        let record = endpoint.stat(&self.root)?;
        let mut walk = Walk {
            endpoint,
            reporter,
            follow_symlinks: self.follow_symlinks,
            followed: Vec::new(),
        };
        Ok(walk.node(&self.root, record)?.unwrap_or_default())
    }
}

struct Walk<'a> {
    endpoint: &'a mut dyn Endpoint,
    reporter: &'a dyn Reporter,
    follow_symlinks: bool,
    /// Resolved targets of the symlinks being followed on the current descent.
    followed: Vec<String>,
}

impl Walk<'_> {
    fn node(&mut self, path: &str, record: StatRecord) -> Result<Option<Tree>, SnapshotError> {
        match record.kind {
            EntryKind::File => Ok(Some(Tree::Leaf(record.times))),
            EntryKind::Directory => self.directory(path, record).map(Some),
            EntryKind::Symlink => self.symlink(path),
            EntryKind::Other => Err(SnapshotError::UnsupportedEntry {
                path: path.to_owned(),
            }),
        }
    }

    fn directory(&mut self, path: &str, record: StatRecord) -> Result<Tree, SnapshotError> {
        let paths = self.endpoint.paths();
        let mut branch = Branch::new(Some(record.times));
        for (name, child) in self.endpoint.list_children(path)? {
            let child_path = paths.join(path, &name);
            if let Some(tree) = self.node(&child_path, child)? {
                branch.insert(name, tree);
            }
        }
        Ok(Tree::Branch(branch))
    }

    fn symlink(&mut self, path: &str) -> Result<Option<Tree>, SnapshotError> {
        if !self.follow_symlinks {
            self.reporter.warn(format_args!("Ignoring symlink {path}"));
            return Ok(None);
        }

        self.reporter.debug(format_args!("Following symlink {path}"));
        let (resolved, record) = match self.resolve(path) {
            Ok(found) => found,
            Err(error) if error.is_path_error() => {
                self.reporter
                    .error(format_args!("Skipping symlink {path}: {error}"));
                return Ok(None);
            }
            Err(error) => return Err(error.into()),
        };

        if self.followed.contains(&resolved) {
            self.reporter.error(format_args!(
                "Skipping symlink {path}: {resolved} is already being followed"
            ));
            return Ok(None);
        }

        self.followed.push(resolved.clone());
        let tree = self.node(&resolved, record);
        self.followed.pop();
        tree
    }

    fn resolve(&mut self, path: &str) -> Result<(String, StatRecord), EndpointError> {
        let resolved = self.endpoint.resolve_symlink(path)?;
        let record = self.endpoint.stat(&resolved)?;
        Ok((resolved, record))
    }
}
