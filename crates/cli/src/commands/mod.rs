// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod app;
pub mod describe;
pub mod install;
pub mod uninstall;
pub mod update;
pub mod validate;
pub mod wait;

use crate::config::Config;
use crate::output::OutputFormat;
use anyhow::Result;
use stackapps_adapters::{AcsClient, Stack, TracedAppsApi};
use stackapps_core::KeyLockManager;
use stackapps_engine::AppReconciler;
use tokio_util::sync::CancellationToken;

pub type Reconciler = AppReconciler<TracedAppsApi<AcsClient>>;

/// Resolved settings shared by every command
pub struct Context {
    pub config: Config,
    pub format: OutputFormat,
    pub cancel: CancellationToken,
}

impl Context {
    pub fn reconciler(&self) -> Result<Reconciler> {
        let client = AcsClient::new(self.config.server(), self.config.credentials()?)
            .with_request_timeout(self.config.timing.request_timeout);
        let stack = Stack::new(self.config.stack()?);
        Ok(
            AppReconciler::new(TracedAppsApi::new(client), stack, KeyLockManager::new())
                .with_timing(self.config.timing.clone()),
        )
    }
}
