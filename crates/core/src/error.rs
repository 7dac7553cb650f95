// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors produced while talking to the control plane

use crate::status::Status;
use thiserror::Error;

/// Failure to complete an HTTP exchange at all
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// A classified failure of one probe
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to decode {status} response: {source}")]
    Decode {
        status: Status,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: Status, body: String },

    #[error("resource already exists: {body}")]
    Conflict { body: String },
}

impl ApiError {
    /// Numeric HTTP code carried by the error, if any
    pub fn code(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => status.code(),
            ApiError::Conflict { .. } => Status::CONFLICT.code(),
            ApiError::Decode { status, .. } => status.code(),
            ApiError::Transport(_) => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }

    /// Whether the remote free-text reason contains `reason`
    ///
    /// Only for failure reasons that have no status code of their own.
    pub fn mentions(&self, reason: &str) -> bool {
        match self {
            ApiError::UnexpectedStatus { body, .. } | ApiError::Conflict { body } => {
                body.contains(reason)
            }
            ApiError::Transport(_) | ApiError::Decode { .. } => false,
        }
    }
}
