#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated config and drafts directories for one test.
pub struct StudioEnv {
    pub dir: TempDir,
}

impl StudioEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.dir.path().join("drafts")
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    /// CLI command preconfigured with plain output and this env's directories.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("invite_studio_cli").expect("binary built");
        cmd.arg("--plain")
            .arg("--config-dir")
            .arg(self.config_dir())
            .arg("--drafts-dir")
            .arg(self.drafts_dir())
            .env_remove("RUST_LOG");
        cmd
    }
}

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn garden_template() -> PathBuf {
    fixture("garden_template.json")
}
