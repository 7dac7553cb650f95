// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the control plane and validation service

pub mod apps;
pub mod traced;
mod transport;
pub mod validation;

pub use apps::{
    AcsClient, AppId, AppKind, AppsApi, Credentials, InstallParams, RequestBody, Stack,
    UpdateParams, DEFAULT_SERVER,
};
pub use traced::{TracedAppsApi, TracedValidationApi};
pub use validation::{
    AppInspectClient, CheckCounts, ReportLink, ValidationApi, ValidationReport, APPINSPECT_URL,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use apps::{AppsCall, AppsOp, FakeAppsApi, FakeReply};
#[cfg(any(test, feature = "test-support"))]
pub use validation::FakeValidationApi;
