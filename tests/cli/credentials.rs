//! Credential resolution through the CLI, observed via `whoami`.

use crate::support::*;

#[test]
fn test_ambiguous_credentials_fail_before_any_call() {
    let t = Test::new();
    t.write(".env.convex", "A=1\n");

    let output = t
        .local_cmd()
        .env("CONVEX_DEPLOY_KEY", PROD_DEPLOY_KEY)
        .arg("sync")
        .output()
        .unwrap();

    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "CONVEX_SELF_HOSTED_URL");
    assert_stderr_contains(&output, "CONVEX_DEPLOY_KEY");
    assert_stderr_contains(&output, "--mode");
}

#[test]
fn test_no_credentials() {
    let t = Test::new();

    let output = t.cmd().arg("whoami").output().unwrap();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "no credentials found");
}

#[test]
fn test_local_mode() {
    let t = Test::new();

    let output = t.local_cmd().arg("whoami").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "self-hosted at http://127.0.0.1:3210");
    assert_stdout_contains(&output, "local");
    assert_output_excludes(&output, "0123456789abcdef");
}

#[test]
fn test_cloud_prod_mode() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("CONVEX_DEPLOY_KEY", PROD_DEPLOY_KEY)
        .arg("whoami")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "happy-animal-123");
    assert_stdout_contains(&output, "https://happy-animal-123.convex.cloud");
    assert_output_excludes(&output, "eyJ2MiI6ImFiYyJ9");
}

#[test]
fn test_mode_flag_resolves_ambiguity() {
    let t = Test::new();

    let output = t
        .local_cmd()
        .env("CONVEX_DEPLOY_KEY", PROD_DEPLOY_KEY)
        .args(["--mode", "cloud", "whoami"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "cloud production deployment happy-animal-123");
}

#[test]
fn test_mode_env_var_resolves_ambiguity() {
    let t = Test::new();

    let output = t
        .local_cmd()
        .env("CONVEX_DEPLOY_KEY", PROD_DEPLOY_KEY)
        .env("ENVSYNC_MODE", "local")
        .arg("whoami")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "self-hosted");
}

#[test]
fn test_mode_flag_beats_env_var_and_config() {
    let t = Test::new();
    t.write(".envsync.toml", "[credentials]\nmode = \"local\"\n");

    let output = t
        .local_cmd()
        .env("CONVEX_DEPLOY_KEY", PROD_DEPLOY_KEY)
        .env("ENVSYNC_MODE", "local")
        .args(["--mode", "cloud", "whoami"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "cloud production");
}

#[test]
fn test_config_mode_resolves_ambiguity() {
    let t = Test::new();
    t.write(".envsync.toml", "[credentials]\nmode = \"cloud\"\n");

    let output = t
        .local_cmd()
        .env("CONVEX_DEPLOY_KEY", PROD_DEPLOY_KEY)
        .arg("whoami")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "cloud production");
}

#[test]
fn test_empty_variable_counts_as_cleared() {
    let t = Test::new();

    let output = t
        .local_cmd()
        .env("CONVEX_DEPLOY_KEY", "")
        .arg("whoami")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "self-hosted");
}

#[test]
fn test_preview_key_requires_name() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("CONVEX_DEPLOY_KEY", PREVIEW_DEPLOY_KEY)
        .arg("whoami")
        .output()
        .unwrap();
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "--preview-name");
}

#[test]
fn test_preview_name_from_env() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("CONVEX_DEPLOY_KEY", PREVIEW_DEPLOY_KEY)
        .env("CONVEX_PREVIEW_NAME", "feature-x")
        .arg("whoami")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "cloud preview deployment feature-x");
}

#[cfg(unix)]
#[test]
fn test_admin_key_command_supplies_missing_key() {
    let t = Test::new();
    t.write(
        ".envsync.toml",
        "[credentials]\nmode = \"local\"\nadmin_key_command = [\"sh\", \"-c\", \"echo starting; echo 'convex-self-hosted|fromscript'\"]\n",
    );

    let output = t
        .cmd()
        .env("CONVEX_SELF_HOSTED_URL", LOCAL_URL)
        .arg("whoami")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "self-hosted");
    assert_output_excludes(&output, "fromscript");
}
