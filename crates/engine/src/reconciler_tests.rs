// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::app::{PrivateApp, SplunkbaseApp};
use stackapps_adapters::{AppsCall, AppsOp, FakeAppsApi, RequestBody};
use std::io::Write;
use std::time::Duration;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

fn timing() -> TimingConfig {
    TimingConfig {
        crud_delay: secs(1),
        poll_delay: secs(1),
        wait_timeout: secs(60),
        min_poll_interval: secs(1),
        max_poll_interval: secs(4),
        retry_deadline: secs(120),
        splunkbase_retry_deadline: secs(120),
        min_backoff: secs(1),
        max_backoff: secs(4),
        ..TimingConfig::default()
    }
}

fn reconciler(api: &FakeAppsApi) -> AppReconciler<FakeAppsApi> {
    AppReconciler::new(api.clone(), Stack::new("acme"), KeyLockManager::new()).with_timing(timing())
}

fn splunkbase(version: &str) -> AppSpec {
    AppSpec::Splunkbase(SplunkbaseApp {
        name: "Splunk_TA_aws".to_string(),
        splunkbase_id: "1876".to_string(),
        version: version.to_string(),
        license_url: "https://example.com/license".to_string(),
    })
}

fn package(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file
}

fn private(package: &std::path::Path) -> AppSpec {
    AppSpec::Private(PrivateApp {
        name: "my_app".to_string(),
        package: package.to_path_buf(),
        legal_ack: "Y".to_string(),
        pre_vetted: true,
    })
}

fn record(version: &str) -> String {
    format!(r#"{{"appID":"Splunk_TA_aws","name":"Splunk_TA_aws","version":"{version}"}}"#)
}

#[tokio::test(start_paused = true)]
async fn create_installs_and_waits_until_visible() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Create, 202, "");
    api.respond(AppsOp::Describe, 404, "not yet")
        .respond(AppsOp::Describe, 200, &record("7.0.0"));
    let apps = reconciler(&api);

    let id = apps
        .create(&splunkbase("7.0.0"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(id, AppId::new("Splunk_TA_aws"));
    assert_eq!(api.call_count(AppsOp::Create), 1);
    assert_eq!(api.call_count(AppsOp::Describe), 2);
    assert!(apps.locks().is_empty());

    let Some(AppsCall::Create { params, body, .. }) = api.calls().into_iter().next() else {
        panic!("expected a create call first");
    };
    assert_eq!(params.licensing_ack.as_deref(), Some("https://example.com/license"));
    assert_eq!(body, RequestBody::splunkbase_form("Splunk_TA_aws", "7.0.0", "1876"));
}

#[tokio::test(start_paused = true)]
async fn create_conflict_adopts_declared_name_without_retrying() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Create, 409, "app Splunk_TA_aws already installed");
    api.respond(AppsOp::Describe, 200, &record("7.0.0"));

    let id = reconciler(&api)
        .create(&splunkbase("7.0.0"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(id, AppId::new("Splunk_TA_aws"));
    assert_eq!(api.call_count(AppsOp::Create), 1);
}

#[tokio::test(start_paused = true)]
async fn create_retries_unavailable_and_throttled() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Create, 503, "maintenance")
        .respond(AppsOp::Create, 429, "slow down")
        .respond(AppsOp::Create, 202, "");
    api.respond(AppsOp::Describe, 200, &record("7.0.0"));

    reconciler(&api)
        .create(&splunkbase("7.0.0"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(api.call_count(AppsOp::Create), 3);
}

#[tokio::test(start_paused = true)]
async fn create_bad_request_is_not_retried() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Create, 400, "invalid version");
    let apps = reconciler(&api);

    let err = apps
        .create(&splunkbase("7.0.0"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, OperationErrorKind::Submit(RetryError::Terminal(_))));
    assert_eq!(err.operation, Operation::Create);
    assert_eq!(err.last_status(), Some(Status::BAD_REQUEST));
    assert_eq!(api.call_count(AppsOp::Create), 1);
    assert_eq!(api.call_count(AppsOp::Describe), 0);
    assert!(apps.locks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn private_install_requires_pre_vetting() {
    let api = FakeAppsApi::new();
    let file = package(b"pkg");
    let AppSpec::Private(mut app) = private(file.path()) else {
        unreachable!()
    };
    app.pre_vetted = false;

    let err = reconciler(&api)
        .create(&AppSpec::Private(app), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, OperationErrorKind::NotPreVetted));
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn private_install_uploads_package_on_each_attempt() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Create, 503, "busy")
        .respond(AppsOp::Create, 202, "");
    api.respond(AppsOp::Describe, 200, "{}");
    let file = package(b"package-bytes");

    reconciler(&api)
        .create(&private(file.path()), &CancellationToken::new())
        .await
        .unwrap();

    let bodies: Vec<RequestBody> = api
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            AppsCall::Create { body, params, .. } => {
                assert_eq!(params.legal_ack.as_deref(), Some("Y"));
                Some(body)
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        bodies,
        vec![RequestBody::Package(b"package-bytes".to_vec()); 2]
    );
}

#[tokio::test(start_paused = true)]
async fn missing_package_fails_without_a_request() {
    let api = FakeAppsApi::new();
    let dir = tempfile::tempdir().unwrap();

    let err = reconciler(&api)
        .create(&private(&dir.path().join("gone.tar.gz")), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        OperationErrorKind::Submit(RetryError::Terminal(StepError::Package { .. }))
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn transient_package_failures_are_retried_three_times() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Create, 400, "Extract app information from the package failed");
    let file = package(b"pkg");

    let err = reconciler(&api)
        .create(&private(file.path()), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, OperationErrorKind::Submit(RetryError::Terminal(_))));
    assert_eq!(api.call_count(AppsOp::Create), 4);
}

#[tokio::test(start_paused = true)]
async fn read_returns_record() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Describe, 429, "slow down")
        .respond(AppsOp::Describe, 200, &record("7.0.0"));

    let found = reconciler(&api)
        .read(&AppId::new("Splunk_TA_aws"), AppKind::Splunkbase, &CancellationToken::new())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.version.as_deref(), Some("7.0.0"));
    assert_eq!(api.call_count(AppsOp::Describe), 2);
}

#[tokio::test(start_paused = true)]
async fn read_of_missing_app_is_none() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Describe, 404, r#"{"code":"404-app-not-found"}"#);

    let found = reconciler(&api)
        .read(&AppId::new("my_app"), AppKind::Private, &CancellationToken::new())
        .await
        .unwrap();

    assert!(found.is_none());
    assert_eq!(api.call_count(AppsOp::Describe), 1);
}

#[tokio::test(start_paused = true)]
async fn read_retries_other_not_found() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Describe, 404, "stack warming up")
        .respond(AppsOp::Describe, 200, "{}");

    let found = reconciler(&api)
        .read(&AppId::new("my_app"), AppKind::Private, &CancellationToken::new())
        .await
        .unwrap();

    assert!(found.is_some());
    assert_eq!(api.call_count(AppsOp::Describe), 2);
}

#[tokio::test(start_paused = true)]
async fn delete_waits_for_not_found() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Delete, 200, "")
        .respond(AppsOp::Delete, 404, "");
    api.respond(AppsOp::Describe, 404, "");
    let apps = reconciler(&api);

    apps.delete(&AppId::new("my_app"), AppKind::Private, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(api.call_count(AppsOp::Delete), 2);
    assert_eq!(api.call_count(AppsOp::Describe), 1);
    assert!(apps.locks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn delete_failure_names_operation_and_app() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Delete, 500, "internal error");

    let err = reconciler(&api)
        .delete(&AppId::new("my_app"), AppKind::Private, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "failed to delete app my_app");
    assert!(matches!(err.kind, OperationErrorKind::Submit(RetryError::Terminal(_))));
}

#[tokio::test(start_paused = true)]
async fn splunkbase_update_rereads_until_version_matches() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Update, 202, "");
    api.respond(AppsOp::Describe, 200, &record("7.0.0"))
        .respond(AppsOp::Describe, 200, &record("7.1.0"));

    let id = reconciler(&api)
        .update(&splunkbase("7.1.0"), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(id, AppId::new("Splunk_TA_aws"));
    assert_eq!(api.call_count(AppsOp::Update), 1);
    assert_eq!(api.call_count(AppsOp::Describe), 2);
    assert_eq!(api.call_count(AppsOp::Delete), 0);
}

#[tokio::test(start_paused = true)]
async fn splunkbase_update_reports_lasting_version_mismatch() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Update, 202, "");
    api.respond(AppsOp::Describe, 200, &record("7.0.0"));

    let err = reconciler(&api)
        .update(&splunkbase("7.1.0"), &CancellationToken::new())
        .await
        .unwrap_err();

    match err.kind {
        OperationErrorKind::Verify(RetryError::DeadlineExceeded { last, .. }) => {
            assert!(matches!(last, Some(StepError::VersionMismatch { .. })));
        }
        other => panic!("expected Verify deadline, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn splunkbase_update_stops_when_reread_finds_nothing() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Update, 202, "");
    api.respond(AppsOp::Describe, 404, r#"{"code":"404-app-not-found"}"#);

    let err = reconciler(&api)
        .update(&splunkbase("7.1.0"), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, OperationErrorKind::Verify(RetryError::Terminal(_))));
    assert_eq!(err.last_status(), Some(Status::NOT_FOUND));
    assert_eq!(api.call_count(AppsOp::Describe), 1);
}

#[tokio::test(start_paused = true)]
async fn private_update_deletes_then_recreates() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Delete, 404, "");
    api.respond(AppsOp::Describe, 404, "")
        .respond(AppsOp::Describe, 200, "{}");
    api.respond(AppsOp::Create, 202, "");
    let file = package(b"v2");
    let apps = reconciler(&api);

    let id = apps
        .update(&private(file.path()), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(id, AppId::new("my_app"));
    let ops: Vec<AppsOp> = api.calls().iter().map(AppsCall::op).collect();
    assert_eq!(
        ops,
        vec![AppsOp::Delete, AppsOp::Describe, AppsOp::Create, AppsOp::Describe]
    );
    assert!(apps.locks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_recreate_is_reported_distinctly() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Delete, 404, "");
    api.respond(AppsOp::Describe, 404, "");
    api.respond(AppsOp::Create, 400, "invalid package");
    let file = package(b"v2");

    let err = reconciler(&api)
        .update(&private(file.path()), &CancellationToken::new())
        .await
        .unwrap_err();

    match &err.kind {
        OperationErrorKind::RecreateFailed(source) => {
            assert_eq!(source.operation, Operation::Create);
        }
        other => panic!("expected RecreateFailed, got {:?}", other),
    }
    assert_eq!(err.operation, Operation::Update);
}

#[tokio::test(start_paused = true)]
async fn await_state_polls_until_target() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Describe, 200, "")
        .respond(AppsOp::Describe, 429, "")
        .respond(AppsOp::Describe, 404, "");

    reconciler(&api)
        .await_state(
            &AppId::new("my_app"),
            AppKind::Private,
            StatusSets::verify_deleted(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(api.call_count(AppsOp::Describe), 3);
}

#[tokio::test(start_paused = true)]
async fn cancelled_operation_makes_no_requests() {
    let api = FakeAppsApi::new();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let apps = reconciler(&api);

    let err = apps
        .create(&splunkbase("7.0.0"), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(api.calls().is_empty());
    assert!(apps.locks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn operations_on_one_stack_are_serialized() {
    let api = FakeAppsApi::new();
    api.respond(AppsOp::Delete, 404, "");
    api.respond(AppsOp::Describe, 404, "");
    let apps = reconciler(&api);
    let cancel = CancellationToken::new();

    let held = apps.locks().acquire("acme", "test", &cancel).await.unwrap();
    let blocked = tokio::time::timeout(
        secs(30),
        apps.delete(&AppId::new("my_app"), AppKind::Private, &cancel),
    )
    .await;
    assert!(blocked.is_err());
    assert!(api.calls().is_empty());

    drop(held);
    apps.delete(&AppId::new("my_app"), AppKind::Private, &cancel)
        .await
        .unwrap();
    assert!(apps.locks().is_empty());
}
