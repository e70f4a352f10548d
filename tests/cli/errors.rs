//! Fatal-error paths: nothing reaches the remote store and the exit status is 1.

use crate::support::*;

#[cfg(unix)]
#[test]
fn test_malformed_file_makes_no_remote_calls() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", MALFORMED_ENV);

    let output = t.sync(&[]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "malformed line 3");
    assert_stderr_contains(&output, "nothing was sent");

    assert!(t.calls().is_empty());
}

#[test]
fn test_missing_source_file() {
    let t = Test::new();

    let output = t.sync(&["does-not-exist.env"]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "does-not-exist.env");
}

#[test]
fn test_unreachable_deployment_reports_partial_failure() {
    let t = Test::new();
    t.write(".env.convex", "A=1\nB=2\n");
    t.write(
        ".envsync.toml",
        &format!("[remote]\nurl = \"{}\"\ntimeout_secs = 2\n", UNREACHABLE_URL),
    );

    let output = t.sync(&[]);
    assert_exit_code(&output, 2);
    assert_stderr_contains(&output, "2 of 2 keys failed");
}

#[test]
fn test_invalid_config_is_fatal() {
    let t = Test::new();
    t.write(".env.convex", "A=1\n");
    t.write(".envsync.toml", "[remote]\ntimeout_secs = 0\n");

    let output = t.sync(&[]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "timeout_secs");
}

#[test]
fn test_unknown_config_field_is_fatal() {
    let t = Test::new();
    t.write(".envsync.toml", "[remote]\nbackend = \"http\"\nretries = 3\n");

    let output = t.local_cmd().arg("whoami").output().unwrap();
    assert_exit_code(&output, 1);
}

#[test]
fn test_explicit_config_path_must_exist() {
    let t = Test::new();

    let output = t
        .local_cmd()
        .args(["--config", "missing.toml", "whoami"])
        .output()
        .unwrap();
    assert_exit_code(&output, 1);
}

#[test]
fn test_usage_error_exits_1() {
    let t = Test::new();

    let output = t.cmd().arg("frobnicate").output().unwrap();
    assert_exit_code(&output, 1);
}

#[test]
fn test_invalid_key_name_rejected_before_resolution() {
    let t = Test::new();

    let output = t.cmd().args(["set", "1BAD", "value"]).output().unwrap();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "must start with a letter");
}
