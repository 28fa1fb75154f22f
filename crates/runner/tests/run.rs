//! Whole runs between two local directories.

use endpoint::{EndpointError, LocalEndpoint};
use flist::Tree;
use logging::RecordingReporter;
use runner::{Direction, ExitCode, RunError, SyncOptions, execute, fix_destination, prepare};
use test_support::{BASE_TIME, FixtureDir, local_endpoint, modified_time};

fn options(fixture: &FixtureDir, source: &str, destination: &str) -> SyncOptions {
    SyncOptions::new(Direction::Push, fixture.join(source), fixture.join(destination))
}

fn sync(options: &SyncOptions) -> Result<runner::SyncReport, RunError> {
    let reporter = RecordingReporter::new();
    let mut source = local_endpoint();
    let mut destination = local_endpoint();
    let report = prepare(options, &mut source, &mut destination, &reporter)?;
    execute(&report, options, &source, &mut destination, &reporter)?;
    Ok(report)
}

fn scenario() -> FixtureDir {
    let fixture = FixtureDir::new();
    fixture.file("src/a/1.txt", b"one", BASE_TIME + 600);
    fixture.file("src/a/2.txt", b"two", BASE_TIME);
    fixture.file("dst/a/2.txt", b"two", BASE_TIME);
    fixture.file("dst/a/3.txt", b"three", BASE_TIME);
    fixture
}

#[test]
fn trailing_separator_syncs_contents_into_destination() {
    let fixture = scenario();
    let options = options(&fixture, "src/", "dst");

    let report = sync(&options).expect("sync");

    assert_eq!(report.plan.destination_root, fixture.join("dst"));
    assert!(report.plan.delete.is_absent());
    assert!(report.plan.copy.descendant(["a", "1.txt"]).is_some());
    assert!(report.plan.unaccounted_destination.descendant(["a", "3.txt"]).is_some());
    assert!(fixture.path().join("dst/a/1.txt").exists());
    assert!(fixture.path().join("dst/a/3.txt").exists());
}

#[test]
fn delete_removes_unaccounted_content() {
    let fixture = scenario();
    let mut options = options(&fixture, "src/", "dst");
    options.delete = true;

    sync(&options).expect("sync");
    assert!(!fixture.path().join("dst/a/3.txt").exists());

    let again = sync(&options).expect("second sync");
    assert!(again.plan.is_noop());
}

#[test]
fn directory_without_trailing_separator_lands_inside_destination() {
    let fixture = scenario();
    let options = options(&fixture, "src", "dst");

    let report = sync(&options).expect("sync");

    assert_eq!(report.plan.destination_root, fixture.join("dst/src"));
    assert!(report.destination.is_absent());
    assert!(fixture.path().join("dst/src/a/1.txt").exists());
    assert_eq!(
        modified_time(&fixture.path().join("dst/src/a/1.txt")),
        BASE_TIME + 600
    );
}

#[test]
fn single_file_is_placed_into_an_existing_directory() {
    let fixture = FixtureDir::new();
    fixture.file("notes.txt", b"n", BASE_TIME);
    fixture.mkdir("dst");

    let report = sync(&options(&fixture, "notes.txt", "dst")).expect("sync");

    assert_eq!(report.plan.copy, Tree::leaf(BASE_TIME, BASE_TIME));
    assert_eq!(
        std::fs::read(fixture.path().join("dst/notes.txt")).expect("copied"),
        b"n"
    );
}

#[test]
fn missing_source_is_fatal() {
    let fixture = FixtureDir::new();
    fixture.mkdir("dst");

    let error = sync(&options(&fixture, "missing", "dst")).expect_err("missing source");
    assert!(matches!(error.endpoint_error(), Some(EndpointError::NotFound { .. })));
    assert_eq!(error.exit_code(), ExitCode::Failure);
}

#[test]
fn exclude_patterns_are_rooted_at_the_destination() {
    let fixture = scenario();
    let mut options = options(&fixture, "src/", "dst");
    options.excludes = vec!["*/1.txt".to_owned()];

    let report = sync(&options).expect("sync");

    assert_eq!(report.excludes, vec![format!("{}/*/1.txt", fixture.join("dst"))]);
    assert!(report.plan.copy.is_absent());
    assert!(!fixture.path().join("dst/a/1.txt").exists());
}

#[test]
fn file_over_directory_is_refused_unless_forced() {
    let fixture = FixtureDir::new();
    fixture.file("src/thing", b"file", BASE_TIME);
    fixture.file("dst/thing/inner.txt", b"dir", BASE_TIME);

    let mut options = options(&fixture, "src/", "dst");
    let error = sync(&options).expect_err("refused");
    assert_eq!(error.exit_code(), ExitCode::OverwriteRefused);
    assert!(fixture.path().join("dst/thing/inner.txt").exists());

    options.force = true;
    sync(&options).expect("forced");
    assert_eq!(
        std::fs::read(fixture.path().join("dst/thing")).expect("replaced"),
        b"file"
    );
}

#[test]
fn dry_run_only_warns_about_conflicts() {
    let fixture = FixtureDir::new();
    fixture.file("src/thing", b"file", BASE_TIME);
    fixture.file("dst/thing/inner.txt", b"dir", BASE_TIME);
    let mut options = options(&fixture, "src/", "dst");
    options.dry_run = true;

    let reporter = RecordingReporter::new();
    let mut source = local_endpoint();
    let mut destination = local_endpoint();
    let report = prepare(&options, &mut source, &mut destination, &reporter).expect("prepare");
    execute(&report, &options, &source, &mut destination, &reporter).expect("dry run");

    assert!(reporter.contains("Overwriting directory"));
    assert!(fixture.path().join("dst/thing/inner.txt").exists());
}

#[cfg(unix)]
#[test]
fn symlinked_destination_is_rejected() {
    let fixture = FixtureDir::new();
    fixture.mkdir("src");
    fixture.mkdir("real");
    std::os::unix::fs::symlink(fixture.path().join("real"), fixture.path().join("alias"))
        .expect("symlink");

    let mut source: LocalEndpoint = local_endpoint();
    let mut destination = local_endpoint();
    let error = fix_destination(
        &mut source,
        &fixture.join("src"),
        &mut destination,
        &fixture.join("alias"),
    )
    .expect_err("symlink destination");
    assert!(matches!(error, RunError::DestinationIsSymlink { .. }));
}

#[test]
fn missing_destination_keeps_paths() {
    let fixture = FixtureDir::new();
    fixture.mkdir("src");
    let mut source = local_endpoint();
    let mut destination = local_endpoint();
    let fixed = fix_destination(
        &mut source,
        &fixture.join("src"),
        &mut destination,
        &fixture.join("nowhere"),
    )
    .expect("fix");
    assert_eq!(fixed, fixture.join("nowhere"));
}
