//! End-to-end dispatcher tests
//!
//! Runs the compiled gait binary from a temp install directory populated with
//! stub tool executables, covering help output, unknown tools, missing
//! binaries, exit-code propagation, and argument forwarding.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const TOOL_NAMES: &[&str] = &[
    "agt", "cchat", "cct", "cgen", "cgt", "cia", "ochat", "oge", "ogt", "oia", "osum", "tc", "tlt",
];

/// Copy the gait binary into `dir` so sibling resolution points there
fn install_gait(dir: &Path) -> PathBuf {
    let dest = dir.join("gait");
    fs::copy(env!("CARGO_BIN_EXE_gait"), &dest).unwrap();
    fs::set_permissions(&dest, fs::Permissions::from_mode(0o755)).unwrap();
    dest
}

/// Write an executable stub tool script
fn write_stub(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn run(gait: &Path, args: &[&str]) -> Output {
    Command::new(gait).args(args).output().unwrap()
}

#[test]
fn test_no_args_and_help_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let gait = install_gait(dir.path());

    let no_args = run(&gait, &[]);
    let help = run(&gait, &["help"]);

    assert_eq!(no_args.status.code(), Some(0));
    assert_eq!(help.status.code(), Some(0));
    assert_eq!(no_args.stdout, help.stdout);

    let stdout = String::from_utf8(help.stdout).unwrap();
    for name in TOOL_NAMES {
        assert!(stdout.contains(name), "help is missing {name}");
    }
    assert!(stdout.contains("Usage:"));
}

#[test]
fn test_unknown_tool_exits_one_without_spawning() {
    let dir = TempDir::new().unwrap();
    let gait = install_gait(dir.path());

    // A stub that would leave a marker if anything spawned it.
    let marker = dir.path().join("spawned");
    write_stub(dir.path(), "tc", &format!("touch {}", marker.display()));

    let output = run(&gait, &["bogus"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("bogus"));
    assert!(stdout.contains("gait help"));
    assert!(!marker.exists());
}

#[test]
fn test_missing_tool_binary_reports_resolved_path() {
    let dir = TempDir::new().unwrap();
    let gait = install_gait(dir.path());

    let output = run(&gait, &["tc"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = dir.path().canonicalize().unwrap().join("tc");
    assert!(
        stdout.contains(expected.to_str().unwrap()),
        "missing resolved path in: {stdout}"
    );
}

#[test]
fn test_child_exit_code_is_propagated() {
    let dir = TempDir::new().unwrap();
    let gait = install_gait(dir.path());
    write_stub(dir.path(), "tc", "exit 7");

    let output = run(&gait, &["tc", "anything"]);
    assert_eq!(output.status.code(), Some(7));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("7"));
}

#[test]
fn test_successful_child_exits_zero_silently() {
    let dir = TempDir::new().unwrap();
    let gait = install_gait(dir.path());
    write_stub(dir.path(), "tc", "echo child-output");

    let output = run(&gait, &["tc"]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("child-output"));
    assert!(!stdout.contains("exited"));
}

#[test]
fn test_arguments_forwarded_verbatim_and_in_order() {
    let dir = TempDir::new().unwrap();
    let gait = install_gait(dir.path());

    let record = dir.path().join("args.txt");
    write_stub(
        dir.path(),
        "tc",
        &format!("printf '%s\\n' \"$@\" > {}", record.display()),
    );

    let output = run(&gait, &["tc", "a b", "c"]);
    assert_eq!(output.status.code(), Some(0));

    let recorded = fs::read_to_string(&record).unwrap();
    assert_eq!(recorded, "a b\nc\n");
}

#[test]
fn test_every_registered_name_resolves_and_launches() {
    let dir = TempDir::new().unwrap();
    let gait = install_gait(dir.path());

    let markers = dir.path().join("markers");
    fs::create_dir(&markers).unwrap();

    for name in TOOL_NAMES {
        write_stub(
            dir.path(),
            name,
            &format!("echo launched > {}/{name}", markers.display()),
        );
    }

    for name in TOOL_NAMES {
        let output = run(&gait, &[name, "--help"]);
        assert_eq!(output.status.code(), Some(0), "{name} did not dispatch");
        assert!(markers.join(name).exists(), "{name} stub never ran");
    }
}

#[test]
fn test_dispatch_is_case_sensitive() {
    let dir = TempDir::new().unwrap();
    let gait = install_gait(dir.path());
    write_stub(dir.path(), "tc", "exit 0");

    let output = run(&gait, &["TC"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stdout).unwrap().contains("TC"));
}
