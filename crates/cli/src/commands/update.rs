// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Update command

use super::app::AppSource;
use super::Context;
use crate::output;
use anyhow::Result;
use clap::Args;
use serde_json::json;
use stackapps_engine::AppSpec;

#[derive(Args)]
pub struct UpdateArgs {
    #[command(subcommand)]
    source: AppSource,
}

pub async fn handle(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let spec = AppSpec::from(args.source);
    let id = ctx.reconciler()?.update(&spec, &ctx.cancel).await?;
    let outcome = json!({
        "app": id,
        "kind": spec.kind(),
        "version": spec.version(),
        "status": "updated",
    });
    output::print(&outcome, ctx.format, |_| match spec.version() {
        Some(version) => format!("Updated {} to {}", id, version),
        None => format!("Reinstalled {}", id),
    });
    Ok(())
}
