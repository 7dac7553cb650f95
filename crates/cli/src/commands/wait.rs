// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wait command

use super::app::KindArg;
use super::Context;
use crate::output;
use anyhow::Result;
use clap::{Args, ValueEnum};
use serde_json::json;
use stackapps_adapters::AppId;
use stackapps_core::StatusSets;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Until {
    /// The app is installed and visible
    Installed,
    /// The app no longer exists
    Uninstalled,
}

#[derive(Args)]
pub struct WaitArgs {
    /// App name
    app: String,
    /// State to wait for
    #[arg(long, value_enum)]
    until: Until,
    /// How the app was installed
    #[arg(long, value_enum, default_value_t)]
    kind: KindArg,
}

pub async fn handle(args: WaitArgs, ctx: &Context) -> Result<()> {
    let id = AppId::new(args.app);
    let (sets, state) = match args.until {
        Until::Installed => (StatusSets::verify_created(), "installed"),
        Until::Uninstalled => (StatusSets::verify_deleted(), "uninstalled"),
    };
    ctx.reconciler()?
        .await_state(&id, args.kind.into(), sets, &ctx.cancel)
        .await?;
    let outcome = json!({ "app": id, "status": state });
    output::print(&outcome, ctx.format, |_| format!("{} is {}", id, state));
    Ok(())
}
