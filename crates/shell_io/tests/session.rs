#![cfg(unix)]

use std::process::Command;

use shell_io::{END_OF_COMMAND, ShellChannel, ShellError, ShellSession};

fn sh_session() -> ShellSession {
    ShellSession::spawn(Command::new("sh"), encoding_rs::UTF_8).expect("spawn sh")
}

#[test]
fn commands_are_framed_by_end_marker() {
    let mut session = sh_session();

    let first = session.run(&["echo", "one two"]).expect("first command");
    assert_eq!(first, vec!["one two".to_owned()]);

    let second = session.run(&["printf", "a\\nb\\n"]).expect("second command");
    assert_eq!(second, vec!["a".to_owned(), "b".to_owned()]);

    let status = session.close().expect("close");
    assert!(status.success());
}

#[test]
fn silent_command_yields_no_lines() {
    let mut session = sh_session();
    let lines = session.run(&["true"]).expect("true");
    assert!(lines.is_empty());
}

#[test]
fn standard_error_is_interleaved() {
    let mut session = sh_session();
    let lines = session
        .run(&["ls", "/definitely/not/here/adbsync"])
        .expect("ls runs");
    assert_eq!(lines.len(), 1, "lines: {lines:?}");
    assert!(lines[0].contains("No such file or directory"), "{lines:?}");
}

#[test]
fn arguments_with_spaces_and_quotes_reach_the_shell_intact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("it's a file");
    std::fs::write(&path, b"x").expect("write");

    let mut session = sh_session();
    let lines = session
        .run(&["ls", path.to_str().expect("utf-8 path")])
        .expect("ls");
    assert_eq!(lines, vec![path.to_str().expect("utf-8 path").to_owned()]);
}

#[test]
fn commands_cannot_consume_the_request_stream() {
    let mut session = sh_session();
    // `cat` would swallow the marker request if stdin were not redirected.
    let lines = session.run(&["cat"]).expect("cat");
    assert!(lines.is_empty());
    let lines = session.run(&["echo", "still alive"]).expect("echo");
    assert_eq!(lines, vec!["still alive".to_owned()]);
}

#[test]
fn early_exit_is_unexpected_eof() {
    let mut session = sh_session();
    let error = session.run(&["exit"]).expect_err("shell exits");
    assert!(matches!(error, ShellError::UnexpectedEof { .. }), "{error:?}");
}

#[test]
fn marker_text_is_not_echoed_as_output() {
    let mut session = sh_session();
    let lines = session.run(&["echo", "before"]).expect("echo");
    assert!(!lines.iter().any(|line| line == END_OF_COMMAND));
}

#[test]
fn closing_after_the_shell_has_exited_reports_its_status() {
    let mut command = Command::new("sh");
    command.args(["-c", "exit 3"]);
    let session = ShellSession::spawn(command, encoding_rs::UTF_8).expect("spawn sh");

    let status = session.close().expect("close");
    assert_eq!(status.code(), Some(3));
}
