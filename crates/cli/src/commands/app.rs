// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Arguments describing the desired app

use clap::{Args, Subcommand, ValueEnum};
use stackapps_adapters::AppKind;
use stackapps_engine::{AppSpec, PrivateApp, SplunkbaseApp};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum AppSource {
    /// App published on Splunkbase
    Splunkbase(SplunkbaseArgs),
    /// App uploaded as a package
    Private(PrivateArgs),
}

#[derive(Args)]
pub struct SplunkbaseArgs {
    /// App name
    #[arg(long)]
    name: String,
    /// Splunkbase app id
    #[arg(long)]
    splunkbase_id: String,
    /// Version to install
    #[arg(long)]
    version: String,
    /// License URL to acknowledge
    #[arg(long)]
    license_url: String,
}

#[derive(Args)]
pub struct PrivateArgs {
    /// App name
    #[arg(long)]
    name: String,
    /// Path to the app package (.tar.gz)
    #[arg(long)]
    package: PathBuf,
    /// Legal terms acknowledgement sent with the upload
    #[arg(long)]
    legal_ack: String,
    /// The package passed validation
    #[arg(long)]
    pre_vetted: bool,
}

impl From<AppSource> for AppSpec {
    fn from(source: AppSource) -> Self {
        match source {
            AppSource::Splunkbase(args) => AppSpec::Splunkbase(SplunkbaseApp {
                name: args.name,
                splunkbase_id: args.splunkbase_id,
                version: args.version,
                license_url: args.license_url,
            }),
            AppSource::Private(args) => AppSpec::Private(PrivateApp {
                name: args.name,
                package: args.package,
                legal_ack: args.legal_ack,
                pre_vetted: args.pre_vetted,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum KindArg {
    Splunkbase,
    #[default]
    Private,
}

impl From<KindArg> for AppKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Splunkbase => AppKind::Splunkbase,
            KindArg::Private => AppKind::Private,
        }
    }
}
