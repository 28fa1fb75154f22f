//! crates/engine/src/executor.rs
//! Applies a reconciled plan to the destination endpoint.

use endpoint::{Endpoint, PathStyle};
use flist::Tree;
use logging::Reporter;

use crate::diff::DiffOutcome;
use crate::error::EngineResult;
use crate::hygiene::{protect_excluded_ancestors, tidy};

/// Which destination-only content a run removes besides the delete tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DeletionPolicy {
    /// Remove nothing beyond the delete tree.
    #[default]
    Keep,
    /// Remove unaccounted content, sparing directories that hold excluded
    /// content.
    Unaccounted,
    /// Remove excluded destination content only.
    Excluded,
    /// Remove excluded content, then every unaccounted path.
    All,
}

impl DeletionPolicy {
    /// Maps the `--del` and `--delete-excluded` switches to a policy.
    #[must_use]
    pub const fn from_flags(delete: bool, delete_excluded: bool) -> Self {
        match (delete, delete_excluded) {
            (false, false) => Self::Keep,
            (true, false) => Self::Unaccounted,
            (false, true) => Self::Excluded,
            (true, true) => Self::All,
        }
    }
}

/// Pruned and sorted diff trees of one run, plus the roots they hang off.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyncPlan {
    /// Normalised source root.
    pub source_root: String,
    /// Normalised destination root.
    pub destination_root: String,
    /// Destination content replaced by the copy.
    pub delete: Tree,
    /// Source content to transfer.
    pub copy: Tree,
    /// Source content skipped by exclusion.
    pub excluded_source: Tree,
    /// Destination content with no source counterpart.
    pub unaccounted_destination: Tree,
    /// Destination content matched by an exclude pattern.
    pub excluded_destination: Tree,
    /// Unaccounted content minus the directories that still hold excluded
    /// content.
    pub protected_unaccounted: Tree,
}

impl SyncPlan {
    /// Tidies every tree of `outcome` and derives the protected unaccounted
    /// tree.
    #[must_use]
    pub fn new(
        outcome: DiffOutcome,
        source_root: impl Into<String>,
        destination_root: impl Into<String>,
    ) -> Self {
        let unaccounted_destination = tidy(outcome.unaccounted_destination);
        let excluded_destination = tidy(outcome.excluded_destination);
        let protected_unaccounted =
            protect_excluded_ancestors(&unaccounted_destination, &excluded_destination);
        Self {
            source_root: source_root.into(),
            destination_root: destination_root.into(),
            delete: tidy(outcome.delete),
            copy: tidy(outcome.copy),
            excluded_source: tidy(outcome.excluded_source),
            unaccounted_destination,
            excluded_destination,
            protected_unaccounted,
        }
    }

    /// `true` when the plan neither copies nor deletes anything.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.delete.is_absent() && self.copy.is_absent()
    }
}

/// Runs the delete, cleanup and copy phases against a destination.
///
/// In dry-run mode every action is reported and no mutating endpoint call is
/// made.
pub struct Executor<'a> {
    reporter: &'a dyn Reporter,
    dry_run: bool,
    show_progress: bool,
}

impl<'a> Executor<'a> {
    /// Creates an executor that mutates the destination.
    #[must_use]
    pub fn new(reporter: &'a dyn Reporter) -> Self {
        Self {
            reporter,
            dry_run: false,
            show_progress: false,
        }
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Lets the transfer tool print its own progress instead of logging each
    /// copied file.
    #[must_use]
    pub const fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Executes `plan` in order: delete tree, policy cleanup, copy tree.
    ///
    /// The first failing endpoint call aborts the run. Nothing is rolled back.
    pub fn execute(
        &self,
        plan: &SyncPlan,
        policy: DeletionPolicy,
        destination: &mut dyn Endpoint,
        source_paths: PathStyle,
    ) -> EngineResult<()> {
        let root = plan.destination_root.as_str();

        if plan.delete.is_absent() {
            self.reporter.info(format_args!("Empty delete tree"));
        } else {
            self.reporter.info(format_args!("Deleting delete tree"));
            self.remove_tree(destination, root, &plan.delete)?;
        }

        match policy {
            DeletionPolicy::Keep => {}
            DeletionPolicy::Excluded => {
                self.cleanup(destination, root, &plan.excluded_destination, "destination excluded")?;
            }
            DeletionPolicy::All => {
                self.cleanup(destination, root, &plan.excluded_destination, "destination excluded")?;
                self.cleanup(
                    destination,
                    root,
                    &plan.unaccounted_destination,
                    "destination unaccounted",
                )?;
            }
            DeletionPolicy::Unaccounted => {
                self.cleanup(
                    destination,
                    root,
                    &plan.protected_unaccounted,
                    "non-excluded-supporting destination unaccounted",
                )?;
            }
        }

        if plan.copy.is_absent() {
            self.reporter.info(format_args!("Empty copy tree"));
            return Ok(());
        }
        self.reporter.info(format_args!("Copying copy tree"));
        let relative = match plan.copy {
            Tree::Leaf(_) => destination.paths().file_name(&plan.source_root),
            _ => ".".to_owned(),
        };
        self.push_tree(
            destination,
            source_paths,
            &plan.source_root,
            &relative,
            &plan.copy,
            root,
        )
    }

    fn cleanup(
        &self,
        destination: &mut dyn Endpoint,
        root: &str,
        tree: &Tree,
        label: &str,
    ) -> EngineResult<()> {
        if tree.is_absent() {
            self.reporter.info(format_args!("Empty {label} tree"));
            return Ok(());
        }
        self.reporter.info(format_args!("Deleting {label} tree"));
        self.remove_tree(destination, root, tree)
    }

    /// Removes `tree` from `endpoint`, rooted at `path`, children first.
    ///
    /// A directory itself is removed only when its branch carries a
    /// self-entry.
    pub fn remove_tree(
        &self,
        endpoint: &mut dyn Endpoint,
        path: &str,
        tree: &Tree,
    ) -> EngineResult<()> {
        match tree {
            Tree::Absent => {}
            Tree::Leaf(_) => {
                self.reporter.info(format_args!("Removing {path}"));
                if !self.dry_run {
                    endpoint.remove_file(path)?;
                }
            }
            Tree::Branch(branch) => {
                let paths = endpoint.paths();
                for (name, child) in branch.children() {
                    let child_path = paths.normalize(&paths.join(path, name));
                    self.remove_tree(endpoint, &child_path, child)?;
                }
                if branch.own().is_some() {
                    self.reporter.info(format_args!("Removing folder {path}"));
                    if !self.dry_run {
                        endpoint.remove_dir_all(path)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Copies `tree` from `source_path` into `destination` at
    /// `destination_path`, top-down.
    ///
    /// `relative` is the path reported for the root of `tree`. Every pushed
    /// file and every created directory gets its source timestamps back; a
    /// directory only after all of its children are in place.
    pub fn push_tree(
        &self,
        destination: &mut dyn Endpoint,
        source_paths: PathStyle,
        source_path: &str,
        relative: &str,
        tree: &Tree,
        destination_path: &str,
    ) -> EngineResult<()> {
        match tree {
            Tree::Absent => {}
            Tree::Leaf(times) => {
                if self.dry_run || !self.show_progress {
                    self.reporter.info(format_args!("{relative}"));
                }
                if !self.dry_run {
                    destination.push_file(source_path, destination_path, self.show_progress)?;
                    destination.set_times(destination_path, *times)?;
                }
            }
            Tree::Branch(branch) => {
                let paths = destination.paths();
                if branch.own().is_some() {
                    self.reporter
                        .info(format_args!("{relative}{}", paths.separator()));
                    if !self.dry_run {
                        destination.create_dir_all(destination_path)?;
                    }
                }
                for (name, child) in branch.children() {
                    self.push_tree(
                        destination,
                        source_paths,
                        &source_paths.normalize(&source_paths.join(source_path, name)),
                        &source_paths.join(relative, name),
                        child,
                        &paths.normalize(&paths.join(destination_path, name)),
                    )?;
                }
                if let Some(times) = branch.own()
                    && !self.dry_run
                {
                    destination.set_times(destination_path, times)?;
                }
            }
        }
        Ok(())
    }
}
