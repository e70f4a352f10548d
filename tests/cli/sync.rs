//! Tests for `envsync sync` against the fake deployment CLI.

#![cfg(unix)]

use crate::support::*;

#[test]
fn test_sync_applies_file_and_skips_signing_keys() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", SAMPLE_ENV);

    let output = t.sync(&[]);
    assert_success(&output);

    assert_eq!(t.stored("SITE_URL").as_deref(), Some("http://localhost:5173"));
    assert_eq!(t.stored("AUTH_GITHUB_ID").as_deref(), Some("gh-client-id"));
    assert_eq!(t.stored("FEATURE_FLAGS").as_deref(), Some("--beta"));
    assert_eq!(t.stored("JWT_PRIVATE_KEY"), None);
    assert_eq!(t.stored("JWKS"), None);

    assert_stderr_contains(&output, "JWT_PRIVATE_KEY");
    assert_stdout_contains(&output, "applied 3 keys (2 skipped)");
}

#[test]
fn test_dash_leading_value_is_passed_after_terminator() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", "FEATURE_FLAGS=--beta\n");

    assert_success(&t.sync(&[]));

    let sets = t.calls_to("set");
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0], vec!["env", "set", "--", "FEATURE_FLAGS", "--beta"]);
}

#[test]
fn test_sync_explicit_file_and_extra_exclude() {
    let t = Test::with_fake_cli();
    t.write("prod.env", "A=1\nB=2\nRESEND_API_KEY=re_123\n");

    let output = t.sync(&["prod.env", "--exclude", "RESEND_API_KEY"]);
    assert_success(&output);

    assert_eq!(t.stored("A").as_deref(), Some("1"));
    assert_eq!(t.stored("B").as_deref(), Some("2"));
    assert_eq!(t.stored("RESEND_API_KEY"), None);
}

#[test]
fn test_partial_failure_exits_2_and_continues() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", "A=1\nB=2\nC=3\n");
    t.fail_on("B", "InvalidEnvVarName: rejected by server");

    let output = t.sync(&[]);
    assert_exit_code(&output, 2);

    assert_eq!(t.stored("A").as_deref(), Some("1"));
    assert_eq!(t.stored("B"), None);
    assert_eq!(t.stored("C").as_deref(), Some("3"));
    assert_stderr_contains(&output, "1 of 3 keys failed");
}

#[test]
fn test_authentication_failure_aborts_with_exit_1() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", "A=1\nB=2\nC=3\n");
    t.fail_on("B", "BadAdminKey: The provided admin key was invalid");

    let output = t.sync(&[]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "authentication rejected");

    assert_eq!(t.stored("A").as_deref(), Some("1"));
    assert_eq!(t.stored("C"), None);
    assert_eq!(t.calls_to("set").len(), 2);
}

#[test]
fn test_sync_is_idempotent() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", "A=1\nB=2\n");
    t.seed("LEGACY", "keep");

    assert_success(&t.sync(&[]));
    let first = t.stored("A");
    assert_success(&t.sync(&[]));

    assert_eq!(t.stored("A"), first);
    assert_eq!(t.stored("LEGACY").as_deref(), Some("keep"));
    assert_eq!(t.calls_to("set").len(), 4);
}

#[test]
fn test_dry_run_writes_nothing() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", "A=1\nB=new\nC=3\n");
    t.seed("A", "1");
    t.seed("B", "old");

    let output = t.sync(&["--dry-run"]);
    assert_success(&output);
    assert_stderr_contains(&output, "would write 2 keys");

    assert!(t.calls_to("set").is_empty());
    assert_eq!(t.stored("B").as_deref(), Some("old"));
}

#[test]
fn test_dry_run_json() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", "A=1\nJWKS={}\n");

    let output = t.sync(&["--dry-run", "--json"]);
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["changes"], 1);
    assert_eq!(json["entries"][0]["key"], "A");
    assert_eq!(json["entries"][0]["status"], "create");
    assert_eq!(json["entries"][1]["status"], "excluded");
}

#[test]
fn test_sync_json_report() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", "A=1\nJWT_PRIVATE_KEY=x\n");

    let output = t.sync(&["--json"]);
    assert_success(&output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["applied"], serde_json::json!(["A"]));
    assert_eq!(json["skipped"], serde_json::json!(["JWT_PRIVATE_KEY"]));
    assert_eq!(json["cancelled"], false);
}

#[test]
fn test_credentials_reach_cli_for_active_mode_only() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", "A=1\n");

    let output = t
        .local_cmd()
        .env("CONVEX_DEPLOY_KEY", PROD_DEPLOY_KEY)
        .args(["--mode", "local", "sync"])
        .output()
        .unwrap();
    assert_success(&output);

    let env_log = std::fs::read_to_string(t.path().join("env.log")).unwrap();
    assert!(env_log.contains(&format!("url={}", LOCAL_URL)));
    assert!(env_log.contains("deploy=\n"));
}

#[test]
fn test_preview_name_is_forwarded() {
    let t = Test::with_fake_cli();
    t.write(".env.convex", "A=1\n");

    let output = t
        .cmd()
        .env("CONVEX_DEPLOY_KEY", PREVIEW_DEPLOY_KEY)
        .args(["sync", "--preview-name", "feature-x"])
        .output()
        .unwrap();
    assert_success(&output);

    let sets = t.calls_to("set");
    assert_eq!(
        sets[0],
        vec!["env", "set", "--preview-name", "feature-x", "--", "A", "1"]
    );
}
