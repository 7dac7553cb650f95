// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-shot probes fed to the poller
//!
//! Each probe makes one request and classifies the response against the
//! status sets of the step it serves.

use crate::app::AppRecord;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stackapps_adapters::{
    AppId, AppsApi, InstallParams, RequestBody, Stack, UpdateParams, ValidationApi,
    ValidationReport,
};
use stackapps_core::{
    classify, classify_status, classify_submission, observe, ApiError, ApiResponse, Observation,
    Status, StatusSets, TransportError,
};

/// Submit an install; a 409 becomes a conflict
pub async fn submit_create<A: AppsApi>(
    api: &A,
    stack: &Stack,
    params: &InstallParams,
    body: RequestBody,
    sets: &StatusSets,
) -> Result<Observation<Option<AppRecord>>, ApiError> {
    let result = api.submit_create(stack, params, body).await;
    log_accepted("install", &result, sets);
    observe(result, |r| classify_submission::<Value>(r, sets)).map(|o| o.map(lenient_record))
}

/// Submit an in-place update
pub async fn submit_update<A: AppsApi>(
    api: &A,
    stack: &Stack,
    app: &AppId,
    params: &UpdateParams,
    body: RequestBody,
    sets: &StatusSets,
) -> Result<Observation<()>, ApiError> {
    let result = api.submit_update(stack, app, params, body).await;
    log_accepted("update", &result, sets);
    observe(result, |r| classify_submission::<Value>(r, sets)).map(|o| o.map(|_| ()))
}

/// Submit an uninstall, re-sent until the app is reported gone
pub async fn submit_delete<A: AppsApi>(
    api: &A,
    stack: &Stack,
    app: &AppId,
    sets: &StatusSets,
) -> Result<Observation<()>, ApiError> {
    let result = api.submit_delete(stack, app).await;
    log_accepted("uninstall", &result, sets);
    observe(result, |r| classify_status(r, sets))
}

/// Describe an app, decoding the body on a target status
pub async fn describe<A: AppsApi, T: DeserializeOwned>(
    api: &A,
    stack: &Stack,
    app: &AppId,
    sets: &StatusSets,
) -> Result<Observation<T>, ApiError> {
    observe(api.describe(stack, app).await, |r| classify(r, sets))
}

/// Describe an app by status alone
pub async fn describe_status<A: AppsApi>(
    api: &A,
    stack: &Stack,
    app: &AppId,
    sets: &StatusSets,
) -> Result<Observation<()>, ApiError> {
    observe(api.describe(stack, app).await, |r| classify_status(r, sets))
}

/// Fetch a validation report and classify it by its domain status
///
/// Any HTTP status other than 200 fails the probe. A reported `error`
/// fails with the report's status; unknown statuses are left to the poller.
pub async fn validation_status<V: ValidationApi>(
    api: &V,
    request_id: &str,
) -> Result<Observation<ValidationReport>, ApiError> {
    let response = api.check_validation_status(request_id).await?;
    let status = response.status();
    if status != Status::OK {
        return Ok(Observation::failure(
            status.clone(),
            ApiError::UnexpectedStatus {
                status,
                body: response.body_text(),
            },
        ));
    }

    let report: ValidationReport = match serde_json::from_slice(&response.body) {
        Ok(report) => report,
        Err(source) => {
            return Ok(Observation::failure(
                status.clone(),
                ApiError::Decode { status, source },
            ))
        }
    };
    let domain = Status::parse_domain(&report.status);
    tracing::debug!(request_id, status = %domain, "validation status");

    if domain == Status::Error {
        return Ok(Observation::failure(
            domain.clone(),
            ApiError::UnexpectedStatus {
                status: domain,
                body: "app validation failed with status: error".to_string(),
            },
        ));
    }
    Ok(Observation::with_payload(domain, report))
}

/// Only a JSON object can describe an app; serde would map arrays by position
fn lenient_record(value: Value) -> Option<AppRecord> {
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

fn log_accepted(action: &str, result: &Result<ApiResponse, TransportError>, sets: &StatusSets) {
    let Ok(response) = result else {
        return;
    };
    if sets.target.contains(&response.status()) || sets.pending.contains(&response.status()) {
        tracing::info!(
            action,
            code = response.code,
            request_id = response.request_id().unwrap_or("-"),
            "request submitted"
        );
    }
}

#[cfg(test)]
#[path = "probes_tests.rs"]
mod tests;
