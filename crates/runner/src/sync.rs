//! crates/runner/src/sync.rs
//! Snapshot, reconcile and execute one sync between two endpoints.

use endpoint::{Endpoint, EndpointError};
use engine::{DeletionPolicy, Executor, Reconciler, SyncPlan};
use filters::ExcludeSet;
use flist::{SnapshotBuilder, SnapshotError, Tree};
use logging::Reporter;

use crate::paths::{fix_destination, root_patterns};
use crate::{RunError, SyncOptions};

/// What a run found and decided, before anything is executed.
#[derive(Clone, Debug)]
pub struct SyncReport {
    /// Source snapshot.
    pub source: Tree,
    /// Destination snapshot; [`Tree::Absent`] when the destination does not
    /// exist yet.
    pub destination: Tree,
    /// Exclude patterns after rooting at the destination.
    pub excludes: Vec<String>,
    /// Tidied diff trees and the normalised roots.
    pub plan: SyncPlan,
}

/// Fixes and normalises the roots, snapshots both sides and reconciles them.
///
/// Nothing is mutated.
///
/// # Errors
///
/// Any failure on the source root is fatal. On the destination root only a
/// missing path is tolerated. Invalid exclude patterns and refused
/// overwrites are fatal as well.
pub fn prepare(
    options: &SyncOptions,
    source: &mut dyn Endpoint,
    destination: &mut dyn Endpoint,
    reporter: &dyn Reporter,
) -> Result<SyncReport, RunError> {
    let destination_path = fix_destination(
        source,
        options.source_path(),
        destination,
        options.destination_path(),
    )?;
    let source_paths = source.paths();
    let destination_paths = destination.paths();
    let source_root = source_paths.normalize(options.source_path());
    let destination_root = destination_paths.normalize(&destination_path);

    let source_tree = SnapshotBuilder::new(&source_root)
        .follow_symlinks(options.copy_links)
        .build(source, reporter)?;
    let destination_tree = match SnapshotBuilder::new(&destination_root)
        .follow_symlinks(options.copy_links)
        .build(destination, reporter)
    {
        Ok(tree) => tree,
        Err(SnapshotError::Endpoint(EndpointError::NotFound { path })) if path == destination_root => {
            tracing::debug!(path = %destination_root, "destination does not exist yet");
            Tree::Absent
        }
        Err(error) => return Err(error.into()),
    };

    let excludes = root_patterns(
        &options.excludes,
        &destination_root,
        destination_paths,
        source_tree.as_branch().is_some(),
    );
    reporter.debug(format_args!("Exclude patterns: {excludes:?}"));
    let exclude_set = ExcludeSet::new(excludes.iter().cloned())?;

    let outcome = Reconciler::new(&exclude_set, reporter)
        .path_styles(source_paths, destination_paths)
        .refuse_overwrite(options.refuse_overwrite())
        .diff(&source_tree, &destination_tree, &source_root, &destination_root)?;

    Ok(SyncReport {
        source: source_tree,
        destination: destination_tree,
        excludes,
        plan: SyncPlan::new(outcome, source_root, destination_root),
    })
}

/// Applies a prepared report to `destination`.
///
/// # Errors
///
/// The first failing endpoint call ends the run; completed actions are kept.
pub fn execute(
    report: &SyncReport,
    options: &SyncOptions,
    source: &dyn Endpoint,
    destination: &mut dyn Endpoint,
    reporter: &dyn Reporter,
) -> Result<(), RunError> {
    let policy = DeletionPolicy::from_flags(options.delete, options.delete_excluded);
    Executor::new(reporter)
        .dry_run(options.dry_run)
        .show_progress(options.show_progress)
        .execute(&report.plan, policy, destination, source.paths())?;
    Ok(())
}
