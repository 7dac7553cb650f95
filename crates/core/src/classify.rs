// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status classification of raw responses

use crate::error::{ApiError, TransportError};
use crate::response::ApiResponse;
use crate::status::{Partition, Status, StatusSets};
use crate::wait::Observation;
use serde::de::DeserializeOwned;

/// Classify a completed exchange against an operation's status sets
///
/// Target statuses decode the body into `T` (an empty body decodes as JSON
/// `null`). Pending statuses carry no payload. Anything else becomes an
/// observation carrying [`ApiError::UnexpectedStatus`].
pub fn classify<T: DeserializeOwned>(response: &ApiResponse, sets: &StatusSets) -> Observation<T> {
    let status = response.status();
    match sets.partition(&status) {
        Partition::Target => match decode(&response.body) {
            Ok(payload) => Observation::with_payload(status, payload),
            Err(source) => Observation::failure(status.clone(), ApiError::Decode { status, source }),
        },
        Partition::Pending => Observation::status(status),
        Partition::Failure => Observation::failure(
            status.clone(),
            ApiError::UnexpectedStatus {
                status,
                body: response.body_text(),
            },
        ),
    }
}

/// Like [`classify`], but a 409 means the resource already exists
pub fn classify_submission<T: DeserializeOwned>(
    response: &ApiResponse,
    sets: &StatusSets,
) -> Observation<T> {
    let status = response.status();
    if status == Status::CONFLICT && sets.partition(&status) == Partition::Failure {
        return Observation::failure(
            status,
            ApiError::Conflict {
                body: response.body_text(),
            },
        );
    }
    classify(response, sets)
}

/// Classify by status alone, ignoring the body
///
/// For existence checks, where a target response (such as a 404) carries no
/// payload worth decoding.
pub fn classify_status(response: &ApiResponse, sets: &StatusSets) -> Observation<()> {
    let status = response.status();
    match sets.partition(&status) {
        Partition::Target => Observation::with_payload(status, ()),
        Partition::Pending => Observation::status(status),
        Partition::Failure => Observation::failure(
            status.clone(),
            ApiError::UnexpectedStatus {
                status,
                body: response.body_text(),
            },
        ),
    }
}

/// Turn a collaborator result into a probe result
///
/// Transport failures never become a status; they surface as `Err`.
pub fn observe<T>(
    result: Result<ApiResponse, TransportError>,
    classifier: impl FnOnce(&ApiResponse) -> Observation<T>,
) -> Result<Observation<T>, ApiError> {
    let response = result?;
    if let Some(request_id) = response.request_id() {
        tracing::debug!(request_id, code = response.code, "classified response");
    }
    Ok(classifier(&response))
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"null")
    } else {
        serde_json::from_slice(body)
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
