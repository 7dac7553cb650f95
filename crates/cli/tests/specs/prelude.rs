// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI specs

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ENV_VARS: [&str; 7] = [
    "STACKAPPS_SERVER",
    "STACKAPPS_STACK",
    "STACKAPPS_TOKEN",
    "STACKAPPS_SPLUNKBASE_SESSION",
    "STACKAPPS_SPLUNK_LOGIN_TOKEN",
    "STACKAPPS_LOG",
    "RUST_LOG",
];

/// Isolated working directory whose config dir holds no stackapps.toml
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `stackapps.toml` in the project root and return its path
    pub fn config(&self, contents: &str) -> PathBuf {
        self.file("stackapps.toml", contents)
    }

    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// `stackapps` with a clean environment
    pub fn stackapps(&self) -> Cli {
        let mut cmd = Command::cargo_bin("stackapps").unwrap();
        for var in ENV_VARS {
            cmd.env_remove(var);
        }
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("HOME", self.dir.path())
            .current_dir(self.dir.path());
        Cli { cmd }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Outcome {
        Outcome {
            assert: self.cmd.assert().success(),
        }
    }

    pub fn fails(mut self) -> Outcome {
        Outcome {
            assert: self.cmd.assert().failure(),
        }
    }
}

pub struct Outcome {
    assert: assert_cmd::assert::Assert,
}

impl Outcome {
    pub fn stdout_has(self, text: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicate::str::contains(text)),
        }
    }

    pub fn stderr_has(self, text: &str) -> Self {
        Self {
            assert: self.assert.stderr(predicate::str::contains(text)),
        }
    }

    pub fn stdout_lacks(self, text: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicate::str::contains(text).not()),
        }
    }
}
