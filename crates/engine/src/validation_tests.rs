// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use stackapps_adapters::{CheckCounts, FakeValidationApi};
use stackapps_core::{ApiResponse, Status, WaitError};
use std::time::Duration;

fn timing() -> TimingConfig {
    TimingConfig {
        poll_delay: Duration::from_secs(1),
        wait_timeout: Duration::from_secs(30),
        min_poll_interval: Duration::from_secs(1),
        max_poll_interval: Duration::from_secs(2),
        ..TimingConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn processing_then_success_returns_report() {
    let api = FakeValidationApi::new();
    api.status("req-1", "processing")
        .status("req-1", "processing")
        .report(&ValidationReport {
            request_id: "req-1".to_string(),
            status: "success".to_string(),
            info: CheckCounts {
                warning: 2,
                success: 40,
                ..CheckCounts::default()
            },
            ..ValidationReport::default()
        });
    let started = tokio::time::Instant::now();

    let report = wait_for_validation(&api, "req-1", &timing(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(report.is_pre_vetted());
    assert_eq!(report.info.warning, 2);
    assert_eq!(api.calls().len(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn error_status_fails_immediately() {
    let api = FakeValidationApi::new();
    api.status("req-2", "error");

    let err = wait_for_validation(&api, "req-2", &timing(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.operation, Operation::Validate);
    assert_eq!(err.last_status(), Some(Status::Error));
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn unknown_status_is_unexpected() {
    let api = FakeValidationApi::new();
    api.status("req-3", "queued");

    let err = wait_for_validation(&api, "req-3", &timing(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        OperationErrorKind::Validation(WaitError::UnexpectedStatus { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn http_error_is_not_retried() {
    let api = FakeValidationApi::new();
    api.respond(ApiResponse::new(401, "unauthorized"));

    let err = wait_for_validation(&api, "req-4", &timing(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.last_status(), Some(Status::from_code(401)));
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn processing_forever_times_out() {
    let api = FakeValidationApi::new();
    api.status("req-5", "processing");

    let err = wait_for_validation(&api, "req-5", &timing(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        OperationErrorKind::Validation(WaitError::Timeout { .. })
    ));
    assert_eq!(err.last_status(), Some(Status::Processing));
}
