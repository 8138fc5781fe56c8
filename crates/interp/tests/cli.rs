//! End-to-end tests for the `stax` file runner
//!
//! Each test writes a source file, runs the built binary over it, and
//! checks the captured output byte for byte.

use std::io::Write;
use std::process::{Command, Stdio};

fn run_file(source: &str) -> std::process::Output {
    let mut file = tempfile::NamedTempFile::new().expect("create temp source file");
    file.write_all(source.as_bytes()).expect("write source");
    Command::new(env!("CARGO_BIN_EXE_stax"))
        .arg(file.path())
        .output()
        .expect("run stax")
}

fn stdout_of(source: &str) -> String {
    let output = run_file(source);
    assert!(output.status.success(), "stax failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf-8 stdout")
}

#[test]
fn prints_sum() {
    assert_eq!(stdout_of("1 2 + print"), "3");
}

#[test]
fn prints_concatenated_strings() {
    assert_eq!(stdout_of("\"hello\" \" \" \"world\" + + print"), "hello world");
}

#[test]
fn prints_bound_literal_sum() {
    assert_eq!(stdout_of("1 \"x\" def x x + print"), "2");
}

#[test]
fn prints_evaluated_block() {
    assert_eq!(stdout_of("{ 2 3 + } eval print"), "5");
}

#[test]
fn while_loop_counts_to_five() {
    assert_eq!(
        stdout_of("0 { dup 5 < } { dup print lf 1 + } while pop"),
        "0\n1\n2\n3\n4\n"
    );
}

#[test]
fn def_is_scope_local_gdef_is_not() {
    assert_eq!(stdout_of("1 \"f\" def { 2 \"f\" def f pop } eval f print"), "1");
    assert_eq!(stdout_of("1 \"f\" def { 2 \"f\" gdef } eval f print"), "2");
}

#[test]
fn stackdump_shows_rotated_stack() {
    // after rotating the top three by one, the old bottom of the window is
    // on top; stackdump prints top to bottom
    assert_eq!(stdout_of("3 2 1 1 3 rotate stackdump"), "3  1  2\n");
}

#[test]
fn stackdump_quotes_strings_and_renders_blocks() {
    assert_eq!(
        stdout_of("1.5 \"a b\" stackdump"),
        "\"a b\"  1.5\n"
    );
    assert_eq!(
        stdout_of("{ 1 \"x\" } stackdump"),
        "{ scopeenter 1 \"x\" scopeleave }\n"
    );
}

#[test]
fn print_uses_g_formatting() {
    assert_eq!(stdout_of("1 3 / print"), "0.333333");
    assert_eq!(stdout_of("1000000 print"), "1e+06");
    assert_eq!(stdout_of("1 0 / print"), "nan");
}

#[test]
fn comments_are_ignored() {
    assert_eq!(stdout_of("# a comment\n40 2 + print # trailing\n"), "42");
}

#[test]
fn reads_program_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stax"))
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn stax");
    child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(b"\"from stdin\" print")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait for stax");
    assert!(output.status.success());
    assert_eq!(output.stdout, b"from stdin");
}

#[test]
fn diagnostics_go_to_stderr_in_red_with_exit_1() {
    let output = run_file("nonesuch");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).expect("utf-8 stderr");
    assert!(stderr.contains("\x1b[31m"), "{stderr}");
    assert!(
        stderr.contains("function or variable 'nonesuch' not found"),
        "{stderr}"
    );
}

#[test]
fn tokenizer_errors_also_fail_the_run() {
    let output = run_file("\"unterminated");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("utf-8 stderr");
    assert!(stderr.contains("unterminated string"), "{stderr}");
}

#[test]
fn missing_file_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_stax"))
        .arg("definitely-not-a-real-file.stax")
        .output()
        .expect("run stax");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).expect("utf-8 stderr");
    assert!(stderr.contains("Cannot read file"), "{stderr}");
}
