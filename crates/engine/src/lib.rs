// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stackapps reconciliation engine
//!
//! Orchestrates app install, describe, update and uninstall on a stack,
//! plus waiting on package validation.

mod app;
mod error;
pub mod probes;
mod reconciler;
pub mod rules;
mod validation;

pub use app::{AppRecord, AppSpec, PrivateApp, SplunkbaseApp};
pub use error::{Operation, OperationError, OperationErrorKind, StepError};
pub use reconciler::{AppReconciler, Phase};
pub use validation::wait_for_validation;
