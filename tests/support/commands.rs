//! Command helper methods for Test.

use super::fixtures::{LOCAL_ADMIN_KEY, LOCAL_URL};
use super::Test;
use assert_cmd::Command;
use std::process::Output;

/// Variables that would otherwise leak in from the developer's shell.
const ISOLATED_VARS: &[&str] = &[
    "CONVEX_SELF_HOSTED_URL",
    "CONVEX_SELF_HOSTED_ADMIN_KEY",
    "CONVEX_DEPLOY_KEY",
    "CONVEX_PREVIEW_NAME",
    "ENVSYNC_MODE",
    "ENVSYNC_LOG",
];

impl Test {
    /// Create an envsync command with a clean credential environment.
    ///
    /// Returns a Command configured with:
    /// - Current directory set to the test project directory
    /// - All credential and log variables removed
    /// - NO_COLOR set so output is plain
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envsync").expect("failed to find envsync binary");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Command with self-hosted credentials exported.
    pub fn local_cmd(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("CONVEX_SELF_HOSTED_URL", LOCAL_URL)
            .env("CONVEX_SELF_HOSTED_ADMIN_KEY", LOCAL_ADMIN_KEY);
        cmd
    }

    /// Shortcut for `envsync sync [args]` with local credentials.
    pub fn sync(&self, args: &[&str]) -> Output {
        self.local_cmd()
            .arg("sync")
            .args(args)
            .output()
            .expect("failed to run envsync sync")
    }

    /// Shortcut for `envsync set KEY VALUE` with local credentials.
    pub fn set(&self, key: &str, value: &str) -> Output {
        self.local_cmd()
            .args(["set", key, value])
            .output()
            .expect("failed to run envsync set")
    }

    /// Shortcut for `envsync get KEY` with local credentials.
    pub fn get(&self, key: &str) -> Output {
        self.local_cmd()
            .args(["get", key])
            .output()
            .expect("failed to run envsync get")
    }

    /// Shortcut for `envsync list` with local credentials.
    pub fn list(&self) -> Output {
        self.local_cmd()
            .arg("list")
            .output()
            .expect("failed to run envsync list")
    }

    /// Shortcut for `envsync list --json` with local credentials.
    pub fn list_json(&self) -> Output {
        self.local_cmd()
            .args(["list", "--json"])
            .output()
            .expect("failed to run envsync list --json")
    }

    /// Shortcut for `envsync keys generate [args]` with local credentials.
    pub fn keys_generate(&self, args: &[&str]) -> Output {
        self.local_cmd()
            .args(["keys", "generate"])
            .args(args)
            .output()
            .expect("failed to run envsync keys generate")
    }
}
