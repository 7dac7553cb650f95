// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Describe command

use super::app::KindArg;
use super::Context;
use crate::output;
use anyhow::Result;
use clap::Args;
use stackapps_adapters::AppId;

#[derive(Args)]
pub struct DescribeArgs {
    /// App name
    app: String,
    /// How the app was installed
    #[arg(long, value_enum, default_value_t)]
    kind: KindArg,
}

pub async fn handle(args: DescribeArgs, ctx: &Context) -> Result<()> {
    let id = AppId::new(args.app);
    let found = ctx
        .reconciler()?
        .read(&id, args.kind.into(), &ctx.cancel)
        .await?;
    output::print(&found, ctx.format, |found| match found {
        Some(record) => output::record_text(record),
        None => format!("App {} not found", id),
    });
    Ok(())
}
