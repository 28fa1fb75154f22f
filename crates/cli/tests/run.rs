//! In-process runs of the front-end.

use cli::{ExitCode, run};

fn run_captured(arguments: &[&str]) -> (ExitCode, String, String) {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let code = run(
        std::iter::once("adbsync").chain(arguments.iter().copied()),
        &mut stdout,
        &mut stderr,
    );
    (
        code,
        String::from_utf8(stdout).expect("stdout is UTF-8"),
        String::from_utf8(stderr).expect("stderr is UTF-8"),
    )
}

#[test]
fn version_goes_to_stdout() {
    let (code, stdout, stderr) = run_captured(&["--version"]);
    assert_eq!(code, ExitCode::Ok);
    assert_eq!(stdout.trim_end(), format!("adbsync {}", env!("CARGO_PKG_VERSION")));
    assert!(stderr.is_empty());
}

#[test]
fn usage_errors_go_to_stderr() {
    let (code, stdout, stderr) = run_captured(&["pull", "/sdcard"]);
    assert_eq!(code, ExitCode::Failure);
    assert!(stdout.is_empty());
    assert!(stderr.contains("LOCAL"));
}

#[test]
fn unstartable_adb_reports_connectivity() {
    let (code, _, stderr) = run_captured(&[
        "--adb-bin",
        "/nonexistent/adb",
        "pull",
        "/sdcard/DCIM",
        "photos",
    ]);
    assert_eq!(code, ExitCode::Connectivity);
    assert!(stderr.starts_with("adbsync: "));
}

#[test]
fn exclude_files_are_read_first() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("none.txt");
    let missing = missing.to_str().expect("UTF-8 temp path");
    let (code, _, stderr) = run_captured(&[
        "--adb-bin",
        "/nonexistent/adb",
        "--exclude-from",
        missing,
        "push",
        "a",
        "b",
    ]);
    assert_eq!(code, ExitCode::Failure);
    assert!(stderr.contains("none.txt"));
}
