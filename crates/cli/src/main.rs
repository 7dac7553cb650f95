// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stackapps - manage apps on a Splunk Cloud stack

mod commands;
mod completions;
mod config;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{describe, install, uninstall, update, validate, wait, Context};
use completions::CompletionsArgs;
use config::Config;
use error::CliError;
use output::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(
    name = "stackapps",
    version,
    about = "Install, update and remove apps on a Splunk Cloud stack"
)]
struct Cli {
    /// Config file (default: <config dir>/stackapps/stackapps.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Stack to operate on
    #[arg(long, global = true)]
    stack: Option<String>,

    /// Admin Config Service URL
    #[arg(long, global = true)]
    server: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install an app and wait until it is visible
    Install(install::InstallArgs),
    /// Describe an installed app
    Describe(describe::DescribeArgs),
    /// Update an app to the given spec
    Update(update::UpdateArgs),
    /// Uninstall an app and wait until it is gone
    Uninstall(uninstall::UninstallArgs),
    /// Wait for an app to be installed or uninstalled
    Wait(wait::WaitArgs),
    /// Wait for an AppInspect validation and print its report
    Validate(validate::ValidateArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprint!("{}", CliError::from_anyhow(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions(args) = &cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env(|name| std::env::var(name).ok());
    if let Some(stack) = cli.stack {
        config.stack = Some(stack);
    }
    if let Some(server) = cli.server {
        config.server = Some(server);
    }

    let cancel = CancellationToken::new();
    let handle = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nCancelling...");
        handle.cancel();
    })?;

    let ctx = Context {
        config,
        format: cli.output,
        cancel,
    };

    match cli.command {
        Commands::Install(args) => install::handle(args, &ctx).await,
        Commands::Describe(args) => describe::handle(args, &ctx).await,
        Commands::Update(args) => update::handle(args, &ctx).await,
        Commands::Uninstall(args) => uninstall::handle(args, &ctx).await,
        Commands::Wait(args) => wait::handle(args, &ctx).await,
        Commands::Validate(args) => validate::handle(args, &ctx).await,
        Commands::Completions(_) => Ok(()),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("STACKAPPS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
