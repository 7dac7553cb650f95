// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Install command

use super::app::AppSource;
use super::Context;
use crate::output;
use anyhow::Result;
use clap::Args;
use serde_json::json;
use stackapps_engine::AppSpec;

#[derive(Args)]
pub struct InstallArgs {
    #[command(subcommand)]
    source: AppSource,
}

pub async fn handle(args: InstallArgs, ctx: &Context) -> Result<()> {
    let spec = AppSpec::from(args.source);
    let id = ctx.reconciler()?.create(&spec, &ctx.cancel).await?;
    let outcome = json!({ "app": id, "kind": spec.kind(), "status": "installed" });
    output::print(&outcome, ctx.format, |_| format!("Installed {}", id));
    Ok(())
}
