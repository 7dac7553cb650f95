// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration
//!
//! Sources, lowest precedence first: `stackapps.toml` (the user config dir,
//! or `--config`), `STACKAPPS_*` environment variables, command line flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use stackapps_adapters::{Credentials, DEFAULT_SERVER};
use stackapps_core::TimingConfig;
use std::path::{Path, PathBuf};

pub const FILE_NAME: &str = "stackapps.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: Option<String>,
    pub stack: Option<String>,
    pub token: Option<String>,
    pub splunkbase_session: Option<String>,
    pub splunk_login_token: Option<String>,
    pub timing: TimingConfig,
}

impl Config {
    /// `<config dir>/stackapps/stackapps.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stackapps").join(FILE_NAME))
    }

    /// Load from `explicit`, which must exist, or from the default path if present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Override file values with `STACKAPPS_*` variables found by `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fields = [
            ("STACKAPPS_SERVER", &mut self.server),
            ("STACKAPPS_STACK", &mut self.stack),
            ("STACKAPPS_TOKEN", &mut self.token),
            ("STACKAPPS_SPLUNKBASE_SESSION", &mut self.splunkbase_session),
            ("STACKAPPS_SPLUNK_LOGIN_TOKEN", &mut self.splunk_login_token),
        ];
        for (name, field) in fields {
            if let Some(value) = lookup(name).filter(|v| !v.is_empty()) {
                *field = Some(value);
            }
        }
    }

    pub fn server(&self) -> &str {
        self.server.as_deref().unwrap_or(DEFAULT_SERVER)
    }

    pub fn stack(&self) -> Result<&str> {
        self.stack
            .as_deref()
            .filter(|s| !s.is_empty())
            .context("no stack configured; pass --stack or set STACKAPPS_STACK")
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let token = self
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .context("no token configured; set STACKAPPS_TOKEN or token in stackapps.toml")?;
        Ok(Credentials {
            token,
            splunkbase_session: self.splunkbase_session.clone(),
            splunk_login_token: self.splunk_login_token.clone(),
        })
    }

    pub fn login_token(&self) -> Result<&str> {
        self.splunk_login_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .context("no Splunk login token configured; set STACKAPPS_SPLUNK_LOGIN_TOKEN")
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
