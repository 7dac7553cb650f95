// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Uninstall command

use super::app::KindArg;
use super::Context;
use crate::output;
use anyhow::Result;
use clap::Args;
use serde_json::json;
use stackapps_adapters::AppId;

#[derive(Args)]
pub struct UninstallArgs {
    /// App name
    app: String,
    /// How the app was installed
    #[arg(long, value_enum, default_value_t)]
    kind: KindArg,
}

pub async fn handle(args: UninstallArgs, ctx: &Context) -> Result<()> {
    let id = AppId::new(args.app);
    ctx.reconciler()?
        .delete(&id, args.kind.into(), &ctx.cancel)
        .await?;
    let outcome = json!({ "app": id, "status": "uninstalled" });
    output::print(&outcome, ctx.format, |_| format!("Uninstalled {}", id));
    Ok(())
}
