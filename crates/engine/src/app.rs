// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desired and observed app state

use crate::error::{OperationErrorKind, StepError};
use serde::{Deserialize, Serialize};
use stackapps_adapters::{AppId, AppKind, InstallParams, RequestBody, UpdateParams};
use std::path::PathBuf;

/// An installed app as the control plane describes it
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppRecord {
    pub name: String,
    #[serde(rename = "appID", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "splunkbaseID", skip_serializing_if = "Option::is_none")]
    pub splunkbase_id: Option<String>,
}

/// A Splunkbase app, installed by id and version
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplunkbaseApp {
    pub name: String,
    pub splunkbase_id: String,
    pub version: String,
    /// License URL the caller acknowledges
    pub license_url: String,
}

/// A private app, uploaded as a package
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrivateApp {
    pub name: String,
    /// Path to the `.tar.gz` package
    pub package: PathBuf,
    pub legal_ack: String,
    /// Whether the package already passed validation
    pub pre_vetted: bool,
}

/// Desired state of one app
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppSpec {
    Splunkbase(SplunkbaseApp),
    Private(PrivateApp),
}

impl AppSpec {
    pub fn name(&self) -> &str {
        match self {
            AppSpec::Splunkbase(app) => &app.name,
            AppSpec::Private(app) => &app.name,
        }
    }

    pub fn kind(&self) -> AppKind {
        match self {
            AppSpec::Splunkbase(_) => AppKind::Splunkbase,
            AppSpec::Private(_) => AppKind::Private,
        }
    }

    /// Identifier the app is installed under
    pub fn id(&self) -> AppId {
        AppId::new(self.name())
    }

    /// Reject a spec that cannot be submitted, before any request is made
    pub fn validate(&self) -> Result<(), OperationErrorKind> {
        let fields: Vec<(&str, &str)> = match self {
            AppSpec::Splunkbase(app) => vec![
                ("name", &app.name),
                ("splunkbase id", &app.splunkbase_id),
                ("version", &app.version),
                ("license url", &app.license_url),
            ],
            AppSpec::Private(app) => vec![
                ("name", &app.name),
                ("package", app.package.to_str().unwrap_or("?")),
                ("legal ack", &app.legal_ack),
            ],
        };
        if let Some((field, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(OperationErrorKind::Invalid(format!("{field} must not be empty")));
        }
        if let AppSpec::Private(app) = self {
            if !app.pre_vetted {
                return Err(OperationErrorKind::NotPreVetted);
            }
        }
        Ok(())
    }

    pub fn install_params(&self) -> InstallParams {
        match self {
            AppSpec::Splunkbase(app) => InstallParams::splunkbase(&app.license_url),
            AppSpec::Private(app) => InstallParams::private(&app.legal_ack),
        }
    }

    pub fn update_params(&self) -> UpdateParams {
        match self {
            AppSpec::Splunkbase(app) => UpdateParams {
                licensing_ack: Some(app.license_url.clone()),
            },
            AppSpec::Private(_) => UpdateParams::default(),
        }
    }

    /// Version the app should report once converged, if pinned
    pub fn version(&self) -> Option<&str> {
        match self {
            AppSpec::Splunkbase(app) => Some(&app.version),
            AppSpec::Private(_) => None,
        }
    }

    /// Build the submission body
    ///
    /// Private packages are read from disk on every call so a retried
    /// submission never reuses a consumed stream.
    pub async fn request_body(&self) -> Result<RequestBody, StepError> {
        match self {
            AppSpec::Splunkbase(app) => Ok(RequestBody::splunkbase_form(
                &app.name,
                &app.version,
                &app.splunkbase_id,
            )),
            AppSpec::Private(app) => tokio::fs::read(&app.package)
                .await
                .map(RequestBody::Package)
                .map_err(|source| StepError::Package {
                    path: app.package.clone(),
                    source,
                }),
        }
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
