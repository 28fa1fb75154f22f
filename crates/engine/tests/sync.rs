//! Snapshot, diff and execute against real directories, with `cp` standing in
//! for the device transfer.

use endpoint::{Endpoint, PathStyle};
use engine::{DeletionPolicy, Executor, Reconciler, SyncPlan};
use filters::ExcludeSet;
use flist::{SnapshotBuilder, Tree};
use logging::RecordingReporter;
use test_support::{BASE_TIME, FixtureDir, local_endpoint, modified_time};

fn plan(source_root: &str, destination_root: &str, excludes: &[String]) -> SyncPlan {
    let reporter = RecordingReporter::new();
    let mut local = local_endpoint();
    let source = SnapshotBuilder::new(source_root)
        .build(&mut local, &reporter)
        .expect("source snapshot");
    let destination = SnapshotBuilder::new(destination_root)
        .build(&mut local, &reporter)
        .expect("destination snapshot");

    let excludes = ExcludeSet::new(excludes).expect("exclude patterns");
    let outcome = Reconciler::new(&excludes, &reporter)
        .path_styles(local.paths(), local.paths())
        .diff(&source, &destination, source_root, destination_root)
        .expect("diff");
    SyncPlan::new(outcome, source_root, destination_root)
}

fn execute(plan: &SyncPlan, policy: DeletionPolicy, dry_run: bool) -> RecordingReporter {
    let reporter = RecordingReporter::new();
    let mut local = local_endpoint();
    Executor::new(&reporter)
        .dry_run(dry_run)
        .execute(plan, policy, &mut local, PathStyle::native())
        .expect("execute");
    reporter
}

/// Source `a/1.txt` (newer) and `a/2.txt`; destination `a/2.txt` and `a/3.txt`.
fn scenario() -> FixtureDir {
    let fixture = FixtureDir::new();
    fixture.file("src/a/1.txt", b"one", BASE_TIME + 600);
    fixture.file("src/a/2.txt", b"two", BASE_TIME);
    fixture.file("dst/a/2.txt", b"two", BASE_TIME);
    fixture.file("dst/a/3.txt", b"three", BASE_TIME);
    fixture
}

#[test]
fn newer_file_is_copied_and_unaccounted_file_kept() {
    let fixture = scenario();
    let plan = plan(&fixture.join("src"), &fixture.join("dst"), &[]);

    assert!(plan.delete.is_absent());
    assert!(matches!(plan.copy.descendant(["a", "1.txt"]), Some(Tree::Leaf(_))));
    assert!(plan.copy.descendant(["a", "2.txt"]).is_none());
    assert!(matches!(
        plan.unaccounted_destination.descendant(["a", "3.txt"]),
        Some(Tree::Leaf(_))
    ));

    execute(&plan, DeletionPolicy::Keep, false);

    let copied = fixture.path().join("dst/a/1.txt");
    assert_eq!(std::fs::read(&copied).expect("copied"), b"one");
    assert_eq!(modified_time(&copied), BASE_TIME + 600);
    assert!(fixture.path().join("dst/a/3.txt").exists());
}

#[test]
fn delete_flag_removes_unaccounted_file() {
    let fixture = scenario();
    let plan = plan(&fixture.join("src"), &fixture.join("dst"), &[]);

    execute(&plan, DeletionPolicy::Unaccounted, false);

    assert!(!fixture.path().join("dst/a/3.txt").exists());
    assert!(fixture.path().join("dst/a/2.txt").exists());
    assert!(fixture.path().join("dst/a/1.txt").exists());
}

#[test]
fn second_run_has_nothing_to_do() {
    let fixture = scenario();
    let first = plan(&fixture.join("src"), &fixture.join("dst"), &[]);
    execute(&first, DeletionPolicy::Unaccounted, false);

    let second = plan(&fixture.join("src"), &fixture.join("dst"), &[]);
    assert!(second.is_noop());
    assert!(second.unaccounted_destination.is_absent());
}

#[test]
fn dry_run_leaves_destination_untouched() {
    let fixture = scenario();
    let plan = plan(&fixture.join("src"), &fixture.join("dst"), &[]);

    let reporter = execute(&plan, DeletionPolicy::All, true);

    assert!(!fixture.path().join("dst/a/1.txt").exists());
    assert!(fixture.path().join("dst/a/3.txt").exists());
    assert!(reporter.contains("Removing "));
    assert!(reporter.contains("1.txt"));
}

#[test]
fn directories_holding_excluded_content_survive_deletion() {
    let fixture = FixtureDir::new();
    fixture.mkdir("src");
    fixture.file("dst/a/b/c", b"c", BASE_TIME);
    fixture.file("dst/a/b/excluded.txt", b"x", BASE_TIME);
    let destination_root = fixture.join("dst");
    let pattern = PathStyle::native().join(&destination_root, "a/b/excluded.txt");

    let plan = plan(&fixture.join("src"), &destination_root, &[pattern]);
    assert!(plan.protected_unaccounted.descendant(["a", "b", "c"]).is_some());
    assert!(plan.protected_unaccounted.descendant(["a"]).and_then(Tree::as_branch).is_some_and(|a| a.own().is_none()));

    execute(&plan, DeletionPolicy::Unaccounted, false);

    assert!(!fixture.path().join("dst/a/b/c").exists());
    assert!(fixture.path().join("dst/a/b/excluded.txt").exists());
}

#[test]
fn excluded_newer_source_is_not_copied() {
    let fixture = scenario();
    let destination_root = fixture.join("dst");
    let pattern = PathStyle::native().join(&destination_root, "*/1.txt");

    let plan = plan(&fixture.join("src"), &destination_root, &[pattern]);
    assert!(plan.copy.is_absent());
    assert!(plan.excluded_source.descendant(["a", "1.txt"]).is_some());
}

#[test]
fn new_directories_are_created_with_source_times() {
    let fixture = FixtureDir::new();
    fixture.file("src/fresh/inner.txt", b"i", BASE_TIME);
    test_support::pin_times(&fixture.path().join("src/fresh"), BASE_TIME, BASE_TIME - 3600);
    fixture.mkdir("dst");

    let plan = plan(&fixture.join("src"), &fixture.join("dst"), &[]);
    execute(&plan, DeletionPolicy::Keep, false);

    let created = fixture.path().join("dst/fresh");
    assert!(created.join("inner.txt").exists());
    assert_eq!(modified_time(&created), BASE_TIME - 3600);
}
