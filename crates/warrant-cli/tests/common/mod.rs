//! Shared E2E test helpers for `warrant` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::time::Duration;
use tempfile::TempDir;

/// Default timeout for basic CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

const CONFIG_VARS: &[&str] = &["WARRANT_DEBUG", "WARRANT_STORE", "WARRANT_DATA_DIR", "RUST_LOG"];

/// Isolated workspace: project root, home directory and data directory
/// all live under one temp dir that is removed on drop.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir for sandbox"),
        }
    }

    /// Command for the `warrant` binary with file storage in the sandbox.
    pub fn cmd(&self) -> assert_cmd::Command {
        let root = self.dir.path();
        let mut cmd: assert_cmd::Command = cargo_bin_cmd!("warrant");
        cmd.timeout(TIMEOUT_BASIC);
        for var in CONFIG_VARS {
            cmd.env_remove(var);
        }
        cmd.env("HOME", root);
        cmd.args(["-C", root.to_str().expect("valid utf8")]);
        cmd.args(["--data-dir", "data"]);
        cmd
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}
