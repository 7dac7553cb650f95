// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! App lifecycle endpoints of the control plane

mod acs;

pub use acs::{AcsClient, Credentials, DEFAULT_SERVER};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{AppsCall, AppsOp, FakeAppsApi, FakeReply};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stackapps_core::{ApiResponse, TransportError};
use std::fmt;

/// The deployment that owns a set of apps; mutating operations lock on it
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stack(pub String);

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an installed app (its app name)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppId(pub String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    /// Published on Splunkbase, installed by id and version
    Splunkbase,
    /// Uploaded as a package file
    Private,
}

impl AppKind {
    pub fn is_splunkbase(self) -> bool {
        matches!(self, AppKind::Splunkbase)
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppKind::Splunkbase => f.write_str("splunkbase"),
            AppKind::Private => f.write_str("private"),
        }
    }
}

/// Query flag and acknowledgement headers of an install
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallParams {
    pub kind: AppKind,
    /// License URL acknowledged for a Splunkbase app (`ACS-Licensing-Ack`)
    pub licensing_ack: Option<String>,
    /// Legal acknowledgement for a private app (`ACS-Legal-Ack`)
    pub legal_ack: Option<String>,
}

impl InstallParams {
    pub fn splunkbase(license_url: impl Into<String>) -> Self {
        Self {
            kind: AppKind::Splunkbase,
            licensing_ack: Some(license_url.into()),
            legal_ack: None,
        }
    }

    pub fn private(legal_ack: impl Into<String>) -> Self {
        Self {
            kind: AppKind::Private,
            licensing_ack: None,
            legal_ack: Some(legal_ack.into()),
        }
    }
}

/// Acknowledgement headers of an in-place update
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateParams {
    pub licensing_ack: Option<String>,
}

/// Payload of an install or update submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestBody {
    /// `application/x-www-form-urlencoded` fields
    Form(Vec<(String, String)>),
    /// Raw app package, sent as `application/octet-stream`
    Package(Vec<u8>),
}

impl RequestBody {
    /// Form body of a Splunkbase install or patch
    pub fn splunkbase_form(name: &str, version: &str, splunkbase_id: &str) -> Self {
        RequestBody::Form(vec![
            ("name".to_string(), name.to_string()),
            ("version".to_string(), version.to_string()),
            ("splunkbaseID".to_string(), splunkbase_id.to_string()),
        ])
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            RequestBody::Form(_) => "application/x-www-form-urlencoded",
            RequestBody::Package(_) => "application/octet-stream",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RequestBody::Form(fields) => fields.len(),
            RequestBody::Package(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// App lifecycle operations of the control plane
///
/// Implementations return the raw exchange; classification happens upstream.
#[async_trait]
pub trait AppsApi: Clone + Send + Sync + 'static {
    /// Submit an install
    async fn submit_create(
        &self,
        stack: &Stack,
        params: &InstallParams,
        body: RequestBody,
    ) -> Result<ApiResponse, TransportError>;

    /// Describe an installed app
    async fn describe(&self, stack: &Stack, app: &AppId) -> Result<ApiResponse, TransportError>;

    /// Submit an in-place update
    async fn submit_update(
        &self,
        stack: &Stack,
        app: &AppId,
        params: &UpdateParams,
        body: RequestBody,
    ) -> Result<ApiResponse, TransportError>;

    /// Submit an uninstall
    async fn submit_delete(&self, stack: &Stack, app: &AppId)
        -> Result<ApiResponse, TransportError>;
}
