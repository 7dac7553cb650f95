// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for orchestrated operations

use stackapps_core::{ApiError, LockError, RetryError, Status, WaitError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Orchestrated operation, as named in errors and logs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Poll,
    Validate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Poll => "poll",
            Operation::Validate => "validate",
        })
    }
}

/// Failure of one attempt inside a retried step
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Wait(#[from] WaitError),

    #[error("app version {actual} does not match the expected version {expected}")]
    VersionMismatch { expected: String, actual: String },

    #[error("failed to read app package {}: {source}", path.display())]
    Package {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StepError {
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            StepError::Wait(e) => e.api_error(),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<u16> {
        match self {
            StepError::Wait(e) => e.code(),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StepError::Wait(e) if e.is_conflict())
    }

    pub fn mentions(&self, reason: &str) -> bool {
        matches!(self, StepError::Wait(e) if e.mentions(reason))
    }
}

#[derive(Debug, Error)]
pub enum OperationErrorKind {
    #[error("{0}")]
    Invalid(String),

    #[error(
        "app must be pre-vetted before it can be installed; validate the package and set pre_vetted"
    )]
    NotPreVetted,

    #[error("could not acquire stack lock")]
    Lock(#[source] LockError),

    #[error("request was not accepted")]
    Submit(#[source] RetryError<StepError>),

    #[error("app did not reach the expected state")]
    Converge(#[source] RetryError<StepError>),

    #[error("could not describe app")]
    Read(#[source] RetryError<StepError>),

    #[error("app did not report the expected version")]
    Verify(#[source] RetryError<StepError>),

    #[error("validation did not succeed")]
    Validation(#[source] WaitError),

    #[error("app was uninstalled but could not be reinstalled")]
    RecreateFailed(#[source] Box<OperationError>),
}

/// A failed operation, annotated with the app it was acting on
#[derive(Debug, Error)]
#[error("failed to {operation} app {app}")]
pub struct OperationError {
    pub operation: Operation,
    pub app: String,
    #[source]
    pub kind: OperationErrorKind,
}

impl OperationError {
    pub fn new(operation: Operation, app: impl Into<String>, kind: OperationErrorKind) -> Self {
        Self {
            operation,
            app: app.into(),
            kind,
        }
    }

    /// Whether the caller's cancellation ended the operation
    pub fn is_cancelled(&self) -> bool {
        match &self.kind {
            OperationErrorKind::Lock(LockError::Cancelled { .. }) => true,
            OperationErrorKind::Submit(e)
            | OperationErrorKind::Converge(e)
            | OperationErrorKind::Read(e)
            | OperationErrorKind::Verify(e) => matches!(
                e,
                RetryError::Cancelled | RetryError::Terminal(StepError::Wait(WaitError::Cancelled))
            ),
            OperationErrorKind::Validation(e) => matches!(e, WaitError::Cancelled),
            OperationErrorKind::RecreateFailed(source) => source.is_cancelled(),
            OperationErrorKind::Invalid(_) | OperationErrorKind::NotPreVetted => false,
        }
    }

    /// Last status observed before giving up, if the failure came from polling
    pub fn last_status(&self) -> Option<Status> {
        let step = match &self.kind {
            OperationErrorKind::Submit(e)
            | OperationErrorKind::Converge(e)
            | OperationErrorKind::Read(e)
            | OperationErrorKind::Verify(e) => e.last(),
            OperationErrorKind::Validation(e) => return wait_status(e),
            OperationErrorKind::RecreateFailed(source) => return source.last_status(),
            _ => None,
        };
        match step {
            Some(StepError::Wait(e)) => wait_status(e),
            _ => None,
        }
    }
}

fn wait_status(error: &WaitError) -> Option<Status> {
    match error {
        WaitError::Failed { status, .. }
        | WaitError::UnexpectedStatus { status, .. }
        | WaitError::MissingPayload { status } => Some(status.clone()),
        WaitError::Timeout { last_status, .. } => last_status.clone(),
        _ => None,
    }
}
