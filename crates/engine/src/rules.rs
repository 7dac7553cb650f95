// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Which failed attempts are worth another try

use crate::error::StepError;
use stackapps_core::{RetryableError, Status};
use std::sync::atomic::{AtomicU32, Ordering};

/// Marker in a 404 body meaning the app does not exist at all
pub const APP_NOT_FOUND: &str = "404-app-not-found";

/// Reasons the control plane gives when it lost track of an uploaded package
pub const TRANSIENT_PACKAGE_REASONS: [&str; 2] = [
    "Extract app information from the package failed",
    "app package not found in the request",
];

/// Attempts granted to transient package failures per operation
pub const PACKAGE_RETRIES: u32 = 3;

/// The step a failed attempt belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Install submission
    Submit,
    /// Waiting for an installed app to become visible
    AwaitExists,
    /// Uninstall submission and waiting for the app to disappear
    AwaitGone,
    /// Describe
    Read,
    /// In-place update submission
    Update,
    /// Re-reading a patched app until it reports the new version
    Verify,
}

/// Remaining retries for transient package failures
#[derive(Debug)]
pub struct TransientBudget(AtomicU32);

impl TransientBudget {
    pub fn new(retries: u32) -> Self {
        Self(AtomicU32::new(retries))
    }

    /// Spend one retry, if any is left
    pub fn take(&self) -> bool {
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn remaining(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for TransientBudget {
    fn default() -> Self {
        Self::new(PACKAGE_RETRIES)
    }
}

/// Whether `error`, raised during `stage`, should be retried
pub fn retryable(stage: Stage, error: &StepError, budget: &TransientBudget) -> bool {
    if matches!(error, StepError::VersionMismatch { .. }) {
        return true;
    }
    if error.is_conflict() {
        return false;
    }

    let status = error.code().map(Status::from_code);
    if status == Some(Status::SERVICE_UNAVAILABLE) || status == Some(Status::TOO_MANY_REQUESTS) {
        return true;
    }
    // The package reasons arrive under several codes, 404 included
    if stage == Stage::Submit
        && TRANSIENT_PACKAGE_REASONS
            .iter()
            .any(|reason| error.mentions(reason))
    {
        return budget.take();
    }
    if status == Some(Status::NOT_FOUND) {
        return match stage {
            Stage::AwaitExists | Stage::Update => true,
            Stage::Read => !error.mentions(APP_NOT_FOUND),
            Stage::Submit | Stage::AwaitGone | Stage::Verify => false,
        };
    }
    false
}

/// Tag `error` for the retry loop
pub fn tag(stage: Stage, error: StepError, budget: &TransientBudget) -> RetryableError<StepError> {
    if retryable(stage, &error, budget) {
        RetryableError::retryable(error)
    } else {
        RetryableError::terminal(error)
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
