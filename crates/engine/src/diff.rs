//! crates/engine/src/diff.rs
//! Five-way structural diff of a source and a destination snapshot.

use endpoint::PathStyle;
use filters::ExcludeSet;
use flist::{Branch, Tree};
use logging::Reporter;

use crate::error::{Conflict, EngineError, EngineResult};

/// The five trees a diff partitions every path into.
///
/// All five share the shape of the inputs. Results come straight out of the
/// walk and still contain [`Tree::Absent`] placeholders; see
/// [`crate::hygiene::prune`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiffOutcome {
    /// Destination content to remove before copying.
    pub delete: Tree,
    /// Source content to copy onto the destination.
    pub copy: Tree,
    /// Source content left alone because its destination path is excluded.
    pub excluded_source: Tree,
    /// Destination content with no source counterpart.
    pub unaccounted_destination: Tree,
    /// Destination content matched by an exclude pattern.
    pub excluded_destination: Tree,
}

/// Accumulates per-child outcomes into five branches.
struct Partition {
    delete: Branch,
    copy: Branch,
    excluded_source: Branch,
    unaccounted_destination: Branch,
    excluded_destination: Branch,
}

impl Partition {
    fn new() -> Self {
        Self {
            delete: Branch::new(None),
            copy: Branch::new(None),
            excluded_source: Branch::new(None),
            unaccounted_destination: Branch::new(None),
            excluded_destination: Branch::new(None),
        }
    }

    fn push(&mut self, name: &str, outcome: DiffOutcome) {
        self.delete.insert(name, outcome.delete);
        self.copy.insert(name, outcome.copy);
        self.excluded_source.insert(name, outcome.excluded_source);
        self.unaccounted_destination
            .insert(name, outcome.unaccounted_destination);
        self.excluded_destination
            .insert(name, outcome.excluded_destination);
    }

    fn finish(self) -> DiffOutcome {
        DiffOutcome {
            delete: self.delete.into(),
            copy: self.copy.into(),
            excluded_source: self.excluded_source.into(),
            unaccounted_destination: self.unaccounted_destination.into(),
            excluded_destination: self.excluded_destination.into(),
        }
    }
}

/// Compares snapshots and decides, per path, what to delete and what to copy.
///
/// The reconciler never touches an endpoint. Destination paths are computed
/// with the destination's [`PathStyle`] and matched against the exclude set;
/// one match gates all five outcomes for that path and everything below it.
pub struct Reconciler<'a> {
    excludes: &'a ExcludeSet,
    reporter: &'a dyn Reporter,
    source_paths: PathStyle,
    destination_paths: PathStyle,
    refuse_overwrite: bool,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler using native path rules on both sides and
    /// refusing destructive type conflicts.
    #[must_use]
    pub fn new(excludes: &'a ExcludeSet, reporter: &'a dyn Reporter) -> Self {
        Self {
            excludes,
            reporter,
            source_paths: PathStyle::native(),
            destination_paths: PathStyle::native(),
            refuse_overwrite: true,
        }
    }

    /// Sets the path rules of both sides.
    #[must_use]
    pub const fn path_styles(mut self, source: PathStyle, destination: PathStyle) -> Self {
        self.source_paths = source;
        self.destination_paths = destination;
        self
    }

    /// Chooses whether a file/directory conflict fails the diff (`true`) or
    /// is only reported as a warning (`false`).
    #[must_use]
    pub const fn refuse_overwrite(mut self, refuse: bool) -> Self {
        self.refuse_overwrite = refuse;
        self
    }

    /// Diffs `source` rooted at `source_path` against `destination` rooted at
    /// `destination_path`.
    pub fn diff(
        &self,
        source: &Tree,
        destination: &Tree,
        source_path: &str,
        destination_path: &str,
    ) -> EngineResult<DiffOutcome> {
        let excluded = self.excludes.is_excluded(destination_path);
        let mut outcome = DiffOutcome::default();

        match (source, destination) {
            (Tree::Absent, Tree::Absent) => {}

            (Tree::Absent, Tree::Leaf(_)) => {
                if excluded {
                    outcome.excluded_destination = destination.clone();
                } else {
                    outcome.unaccounted_destination = destination.clone();
                }
            }

            (Tree::Absent, Tree::Branch(branch)) => {
                if excluded {
                    outcome.excluded_destination = destination.clone();
                } else {
                    outcome = self.destination_only(branch, source_path, destination_path)?;
                }
            }

            (Tree::Leaf(_), Tree::Absent) => {
                if excluded {
                    outcome.excluded_source = source.clone();
                } else {
                    outcome.copy = source.clone();
                }
            }

            (Tree::Leaf(theirs), Tree::Leaf(ours)) => {
                if excluded {
                    outcome.excluded_source = source.clone();
                    outcome.excluded_destination = destination.clone();
                } else if theirs.modified > ours.modified {
                    outcome.delete = destination.clone();
                    outcome.copy = source.clone();
                }
            }

            (Tree::Leaf(_), Tree::Branch(_)) => {
                if excluded {
                    outcome.excluded_source = source.clone();
                    outcome.excluded_destination = destination.clone();
                } else {
                    self.type_conflict(Conflict::FileOverDirectory, source_path, destination_path)?;
                    outcome.delete = destination.clone();
                    outcome.copy = source.clone();
                }
            }

            (Tree::Branch(branch), Tree::Absent) => {
                if excluded {
                    outcome.excluded_source = source.clone();
                } else {
                    outcome = self.source_only(branch, source_path, destination_path)?;
                }
            }

            (Tree::Branch(branch), Tree::Leaf(_)) => {
                if excluded {
                    outcome.excluded_source = source.clone();
                    outcome.excluded_destination = destination.clone();
                } else {
                    self.type_conflict(Conflict::DirectoryOverFile, source_path, destination_path)?;
                    outcome = self.source_only(branch, source_path, destination_path)?;
                    outcome.delete = destination.clone();
                }
            }

            (Tree::Branch(theirs), Tree::Branch(ours)) => {
                if excluded {
                    outcome.excluded_source = source.clone();
                    outcome.excluded_destination = destination.clone();
                } else {
                    outcome = self.both(theirs, ours, source_path, destination_path)?;
                }
            }
        }

        Ok(outcome)
    }

    /// Destination child paths are normalized so they compare equal to the
    /// rooted exclude patterns, which are normalized too (`./x` is `x`).
    fn child_paths(&self, source_path: &str, destination_path: &str, name: &str) -> (String, String) {
        (
            self.source_paths.join(source_path, name),
            self.destination_paths
                .normalize(&self.destination_paths.join(destination_path, name)),
        )
    }

    /// Source directory with nothing to diff against: copy it, creating the
    /// directory itself, except where exclusions say otherwise.
    fn source_only(
        &self,
        branch: &Branch,
        source_path: &str,
        destination_path: &str,
    ) -> EngineResult<DiffOutcome> {
        let mut partition = Partition::new();
        partition.copy.set_own(branch.own());
        for (name, child) in branch.children() {
            let (source_child, destination_child) =
                self.child_paths(source_path, destination_path, name);
            let outcome = self.diff(child, &Tree::Absent, &source_child, &destination_child)?;
            partition.push(name, outcome);
        }
        Ok(partition.finish())
    }

    /// Destination directory with no source counterpart. The directory is
    /// reported as unaccounted with its self-entry but never put on the
    /// delete tree by itself.
    fn destination_only(
        &self,
        branch: &Branch,
        source_path: &str,
        destination_path: &str,
    ) -> EngineResult<DiffOutcome> {
        let mut partition = Partition::new();
        partition.unaccounted_destination.set_own(branch.own());
        for (name, child) in branch.children() {
            let (source_child, destination_child) =
                self.child_paths(source_path, destination_path, name);
            let outcome = self.diff(&Tree::Absent, child, &source_child, &destination_child)?;
            partition.push(name, outcome);
        }
        Ok(partition.finish())
    }

    /// Both sides are directories: diff the union of names, source children
    /// first in source order, then destination-only children.
    fn both(
        &self,
        theirs: &Branch,
        ours: &Branch,
        source_path: &str,
        destination_path: &str,
    ) -> EngineResult<DiffOutcome> {
        let mut partition = Partition::new();
        for (name, child) in theirs.children() {
            let counterpart = ours.child(name).unwrap_or(&Tree::Absent);
            let (source_child, destination_child) =
                self.child_paths(source_path, destination_path, name);
            let outcome = self.diff(child, counterpart, &source_child, &destination_child)?;
            partition.push(name, outcome);
        }
        for (name, child) in ours.children() {
            if theirs.child(name).is_some() {
                continue;
            }
            let (source_child, destination_child) =
                self.child_paths(source_path, destination_path, name);
            let outcome = self.diff(&Tree::Absent, child, &source_child, &destination_child)?;
            partition.push(name, outcome);
        }
        Ok(partition.finish())
    }

    fn type_conflict(
        &self,
        conflict: Conflict,
        source_path: &str,
        destination_path: &str,
    ) -> EngineResult<()> {
        if self.refuse_overwrite {
            return Err(EngineError::OverwriteRefused {
                source_path: source_path.to_owned(),
                destination_path: destination_path.to_owned(),
                conflict,
            });
        }
        self.reporter.warn(format_args!(
            "Overwriting {} {destination_path} with {} {source_path}",
            conflict.destination_noun(),
            conflict.source_noun()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hygiene::tidy;
    use endpoint::Times;
    use logging::{Level, RecordingReporter};

    const POSIX: PathStyle = PathStyle::posix();

    fn dir<const N: usize>(children: [(&str, Tree); N]) -> Tree {
        Tree::from(Branch::from_parts(Some(Times::default()), children))
    }

    fn bare<const N: usize>(children: [(&str, Tree); N]) -> Tree {
        Tree::from(Branch::from_parts(None, children))
    }

    fn run(
        source: &Tree,
        destination: &Tree,
        patterns: &[&str],
        refuse: bool,
        reporter: &RecordingReporter,
    ) -> EngineResult<DiffOutcome> {
        let excludes = ExcludeSet::new(patterns.iter().copied()).expect("patterns");
        let outcome = Reconciler::new(&excludes, reporter)
            .path_styles(POSIX, POSIX)
            .refuse_overwrite(refuse)
            .diff(source, destination, "/src", "/dst")?;
        Ok(DiffOutcome {
            delete: tidy(outcome.delete),
            copy: tidy(outcome.copy),
            excluded_source: tidy(outcome.excluded_source),
            unaccounted_destination: tidy(outcome.unaccounted_destination),
            excluded_destination: tidy(outcome.excluded_destination),
        })
    }

    fn diff(source: &Tree, destination: &Tree, patterns: &[&str]) -> DiffOutcome {
        run(source, destination, patterns, true, &RecordingReporter::new()).expect("diff")
    }

    #[test]
    fn both_absent_is_empty() {
        assert_eq!(diff(&Tree::Absent, &Tree::Absent, &[]), DiffOutcome::default());
    }

    #[test]
    fn newer_source_file_replaces_destination() {
        let outcome = diff(&Tree::leaf(0, 120), &Tree::leaf(0, 60), &[]);
        assert_eq!(outcome.delete, Tree::leaf(0, 60));
        assert_eq!(outcome.copy, Tree::leaf(0, 120));
    }

    #[test]
    fn equal_or_older_source_never_copies() {
        for (source, destination) in [
            (Tree::leaf(0, 60), Tree::leaf(999, 60)),
            (Tree::leaf(999, 60), Tree::leaf(0, 60)),
            (Tree::leaf(0, 60), Tree::leaf(0, 120)),
        ] {
            let outcome = diff(&source, &destination, &[]);
            assert!(outcome.delete.is_absent());
            assert!(outcome.copy.is_absent());
        }
    }

    #[test]
    fn destination_only_file_is_unaccounted() {
        let outcome = diff(&Tree::Absent, &Tree::leaf(0, 0), &[]);
        assert_eq!(outcome.unaccounted_destination, Tree::leaf(0, 0));
        assert!(outcome.delete.is_absent());
    }

    #[test]
    fn destination_only_directory_keeps_self_entry_in_unaccounted_only() {
        let destination = bare([(
            "a",
            dir([("b", dir([("c", Tree::leaf(0, 0))]))]),
        )]);
        let outcome = diff(&bare([]), &destination, &[]);
        assert_eq!(outcome.unaccounted_destination, destination);
        assert!(outcome.delete.is_absent());
        assert!(outcome.excluded_destination.is_absent());
    }

    #[test]
    fn source_only_directory_is_copied_with_self_entry() {
        let source = dir([("sub", dir([])), ("x", Tree::leaf(0, 0))]);
        let outcome = diff(&source, &Tree::Absent, &[]);
        assert_eq!(outcome.copy, source);
    }

    #[test]
    fn excluded_source_only_directory_stays_out_of_copy() {
        let source = bare([("cache", dir([("x", Tree::leaf(0, 0))]))]);
        let outcome = diff(&source, &bare([]), &["/dst/cache"]);
        assert!(outcome.copy.is_absent());
        assert_eq!(
            outcome.excluded_source,
            bare([("cache", dir([("x", Tree::leaf(0, 0))]))])
        );
    }

    #[test]
    fn excluded_paths_never_reach_delete_or_copy() {
        let source = bare([("keep.tmp", Tree::leaf(0, 600))]);
        let destination = bare([
            ("keep.tmp", Tree::leaf(0, 60)),
            ("old.tmp", Tree::leaf(0, 60)),
        ]);
        let outcome = diff(&source, &destination, &["/dst/*.tmp"]);
        assert!(outcome.delete.is_absent());
        assert!(outcome.copy.is_absent());
        assert_eq!(outcome.excluded_source, bare([("keep.tmp", Tree::leaf(0, 600))]));
        assert_eq!(
            outcome.excluded_destination,
            bare([
                ("keep.tmp", Tree::leaf(0, 60)),
                ("old.tmp", Tree::leaf(0, 60)),
            ])
        );
        assert!(outcome.unaccounted_destination.is_absent());
    }

    #[test]
    fn file_over_directory_is_refused_by_default() {
        let error = run(
            &Tree::leaf(0, 0),
            &dir([]),
            &[],
            true,
            &RecordingReporter::new(),
        )
        .expect_err("refused");
        assert!(matches!(
            error,
            EngineError::OverwriteRefused {
                conflict: Conflict::FileOverDirectory,
                ..
            }
        ));
    }

    #[test]
    fn file_over_directory_with_force_replaces_whole_directory() {
        let reporter = RecordingReporter::new();
        let destination = dir([("inner", Tree::leaf(0, 0))]);
        let outcome = run(&Tree::leaf(0, 0), &destination, &[], false, &reporter).expect("forced");
        assert_eq!(outcome.delete, destination);
        assert_eq!(outcome.copy, Tree::leaf(0, 0));
        assert_eq!(
            reporter.messages_at(Level::WARN),
            vec!["Overwriting directory /dst with file /src".to_owned()]
        );
    }

    #[test]
    fn directory_over_file_with_force_deletes_file_and_copies_tree() {
        let reporter = RecordingReporter::new();
        let source = dir([("inner", Tree::leaf(0, 0))]);
        let outcome =
            run(&source, &Tree::leaf(0, 0), &[], false, &reporter).expect("forced");
        assert_eq!(outcome.delete, Tree::leaf(0, 0));
        assert_eq!(outcome.copy, source);
        assert!(reporter.contains("Overwriting file /dst with directory /src"));
    }

    #[test]
    fn directory_over_file_refused() {
        let error = run(
            &bare([("a", dir([]))]),
            &bare([("a", Tree::leaf(0, 0))]),
            &[],
            true,
            &RecordingReporter::new(),
        )
        .expect_err("refused");
        match error {
            EngineError::OverwriteRefused {
                source_path,
                destination_path,
                conflict,
            } => {
                assert_eq!(source_path, "/src/a");
                assert_eq!(destination_path, "/dst/a");
                assert_eq!(conflict, Conflict::DirectoryOverFile);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn excluded_type_conflicts_are_left_alone() {
        let outcome = diff(
            &bare([("a", dir([("x", Tree::leaf(0, 0))]))]),
            &bare([("a", Tree::leaf(0, 0))]),
            &["/dst/a"],
        );
        assert!(outcome.delete.is_absent());
        assert!(outcome.copy.is_absent());
        assert_eq!(outcome.excluded_destination, bare([("a", Tree::leaf(0, 0))]));

        let outcome = diff(
            &bare([("a", Tree::leaf(0, 0))]),
            &bare([("a", dir([]))]),
            &["/dst/a"],
        );
        assert!(outcome.delete.is_absent());
        assert!(outcome.copy.is_absent());
        assert_eq!(outcome.excluded_source, bare([("a", Tree::leaf(0, 0))]));
    }

    #[test]
    fn excluded_directory_on_both_sides_is_reported_whole() {
        let source = bare([("skip", dir([("s", Tree::leaf(0, 0))]))]);
        let destination = bare([("skip", dir([("d", Tree::leaf(0, 0))]))]);
        let outcome = diff(&source, &destination, &["/dst/skip"]);
        assert_eq!(outcome.excluded_source, source);
        assert_eq!(outcome.excluded_destination, destination);
        assert!(outcome.unaccounted_destination.is_absent());
    }

    #[test]
    fn wildcards_cross_directory_boundaries() {
        let source = bare([("a", dir([("b", dir([("c.log", Tree::leaf(0, 60))]))]))]);
        let outcome = diff(&source, &bare([]), &["/dst/*.log"]);
        assert_eq!(
            outcome.copy,
            bare([("a", dir([("b", dir([]))]))])
        );
        assert!(outcome.excluded_source.descendant(["a", "b", "c.log"]).is_some());
    }

    #[test]
    fn children_are_visited_source_first() {
        let source = bare([("z", Tree::leaf(0, 60)), ("m", Tree::leaf(0, 60))]);
        let destination = bare([("b", Tree::leaf(0, 0)), ("z", Tree::leaf(0, 0))]);
        let excludes = ExcludeSet::empty();
        let reporter = RecordingReporter::new();
        let outcome = Reconciler::new(&excludes, &reporter)
            .path_styles(POSIX, POSIX)
            .diff(&source, &destination, "/src", "/dst")
            .expect("diff");
        let names: Vec<&str> = outcome
            .delete
            .as_branch()
            .expect("branch")
            .children()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "m", "b"]);
    }

    #[test]
    fn exclusions_match_below_a_current_directory_root() {
        let source = bare([("cache", Tree::leaf(0, 600)), ("a", dir([("cache", Tree::leaf(0, 600))]))]);
        let destination = bare([("cache", Tree::leaf(0, 60)), ("old", Tree::leaf(0, 60))]);
        let excludes = ExcludeSet::new(["cache", "*/cache"]).expect("patterns");
        let reporter = RecordingReporter::new();
        let outcome = Reconciler::new(&excludes, &reporter)
            .path_styles(POSIX, POSIX)
            .diff(&source, &destination, "/sdcard/DCIM", ".")
            .expect("diff");

        assert!(tidy(outcome.delete).is_absent());
        assert_eq!(tidy(outcome.copy), bare([("a", dir([]))]));
        assert_eq!(
            tidy(outcome.excluded_destination),
            bare([("cache", Tree::leaf(0, 60))])
        );
        assert_eq!(
            tidy(outcome.unaccounted_destination),
            bare([("old", Tree::leaf(0, 60))])
        );
        assert!(tidy(outcome.excluded_source).descendant(["a", "cache"]).is_some());
    }

    #[test]
    fn wide_directories_diff_every_entry() {
        let names: Vec<String> = (0..20_000).map(|n| format!("IMG_{n:05}.jpg")).collect();
        let source = Tree::from(Branch::from_parts(
            None,
            names.iter().map(|name| (name.as_str(), Tree::leaf(0, 120))),
        ));
        let destination = Tree::from(Branch::from_parts(
            None,
            names.iter().step_by(2).map(|name| (name.as_str(), Tree::leaf(0, 120))),
        ));

        let outcome = diff(&source, &destination, &[]);

        assert!(outcome.delete.is_absent());
        let copied = outcome.copy.as_branch().expect("branch").children();
        assert_eq!(copied.len(), names.len() / 2);
        assert_eq!(copied[0].0, "IMG_00001.jpg");
    }
}
