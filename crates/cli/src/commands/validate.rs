// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validate command

use super::Context;
use crate::output;
use anyhow::{bail, Result};
use clap::Args;
use stackapps_adapters::{AppInspectClient, TracedValidationApi};
use stackapps_engine::wait_for_validation;

#[derive(Args)]
pub struct ValidateArgs {
    /// AppInspect request id returned by the package upload
    request_id: String,
    /// AppInspect validation endpoint
    #[arg(long, hide = true)]
    appinspect_url: Option<String>,
}

pub async fn handle(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let mut client = AppInspectClient::new(ctx.config.login_token()?)
        .with_request_timeout(ctx.config.timing.request_timeout);
    if let Some(url) = args.appinspect_url {
        client = client.with_base_url(url);
    }
    let api = TracedValidationApi::new(client);

    let report =
        wait_for_validation(&api, &args.request_id, &ctx.config.timing, &ctx.cancel).await?;
    output::print(&report, ctx.format, output::report_text);

    if !report.is_pre_vetted() {
        bail!(
            "validation {} reported {} errors and {} failures",
            report.request_id,
            report.info.error,
            report.info.failure
        );
    }
    Ok(())
}
