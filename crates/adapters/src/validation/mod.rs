// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! App package validation service

mod appinspect;

pub use appinspect::{AppInspectClient, APPINSPECT_URL};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeValidationApi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stackapps_core::{ApiResponse, TransportError};

/// Remote validation of an uploaded app package
#[async_trait]
pub trait ValidationApi: Clone + Send + Sync + 'static {
    /// Fetch the current state of a validation request
    async fn check_validation_status(&self, request_id: &str)
        -> Result<ApiResponse, TransportError>;
}

/// Body of a validation status response
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub request_id: String,
    pub status: String,
    #[serde(default)]
    pub links: Vec<ReportLink>,
    #[serde(default)]
    pub info: CheckCounts,
}

impl ValidationReport {
    /// Validated without errors or failures
    pub fn is_pre_vetted(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("success")
            && self.info.error == 0
            && self.info.failure == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLink {
    pub href: String,
    pub rel: String,
}

/// Number of checks per outcome
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckCounts {
    pub error: u32,
    pub failure: u32,
    pub skipped: u32,
    pub not_applicable: u32,
    pub warning: u32,
    pub manual_check: u32,
    pub success: u32,
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
