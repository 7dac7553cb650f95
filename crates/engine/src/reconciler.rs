// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! App lifecycle orchestration
//!
//! Every mutating operation holds the stack's lock for its whole duration,
//! submits through the retry policy, then waits for the control plane to
//! converge on the requested state.

use crate::app::{AppRecord, AppSpec};
use crate::error::{Operation, OperationError, OperationErrorKind, StepError};
use crate::probes;
use crate::rules::{self, Stage, TransientBudget, APP_NOT_FOUND};
use stackapps_adapters::{AppId, AppKind, AppsApi, Stack};
use stackapps_core::{
    retry, wait_for_state, KeyLockGuard, KeyLockManager, RetryError, RetryPolicy, RetryableError,
    Status, StatusSets, TimingConfig, WaitConfig,
};
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Progress of one mutating operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Submitting,
    AwaitingAccepted,
    AwaitingConverged,
    Converged,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Submitting => "submitting",
            Phase::AwaitingAccepted => "awaiting_accepted",
            Phase::AwaitingConverged => "awaiting_converged",
            Phase::Converged => "converged",
            Phase::Failed => "failed",
        })
    }
}

fn enter(phase: Phase) {
    match phase {
        Phase::Failed => tracing::warn!(%phase, "phase"),
        _ => tracing::info!(%phase, "phase"),
    }
}

/// Drives apps on one stack toward their desired state
#[derive(Clone)]
pub struct AppReconciler<A> {
    api: A,
    stack: Stack,
    locks: KeyLockManager,
    timing: TimingConfig,
}

impl<A: AppsApi> AppReconciler<A> {
    /// `locks` may be shared with reconcilers of other stacks
    pub fn new(api: A, stack: Stack, locks: KeyLockManager) -> Self {
        Self {
            api,
            stack,
            locks,
            timing: TimingConfig::default(),
        }
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn locks(&self) -> &KeyLockManager {
        &self.locks
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Install an app and wait until it is visible
    ///
    /// An app that already exists under the declared name is adopted.
    pub async fn create(
        &self,
        spec: &AppSpec,
        cancel: &CancellationToken,
    ) -> Result<AppId, OperationError> {
        let span = tracing::info_span!(
            "app.create",
            stack = %self.stack,
            app = spec.name(),
            kind = %spec.kind()
        );
        async {
            spec.validate()
                .map_err(|kind| OperationError::new(Operation::Create, spec.name(), kind))?;
            let _guard = self.lock(Operation::Create, spec.name(), cancel).await?;
            self.create_locked(spec, cancel).await
        }
        .instrument(span)
        .await
    }

    /// Describe an app; `None` once the control plane reports it does not exist
    pub async fn read(
        &self,
        app: &AppId,
        kind: AppKind,
        cancel: &CancellationToken,
    ) -> Result<Option<AppRecord>, OperationError> {
        let span = tracing::info_span!("app.read", stack = %self.stack, app = %app, kind = %kind);
        async {
            let wait = self.timing.read_wait(StatusSets::read());
            let policy = self.timing.retry_policy(kind.is_splunkbase());
            match self.describe(app, &wait, &policy, Stage::Read, cancel).await {
                Ok(record) => Ok(Some(record)),
                Err(RetryError::Terminal(e)) if e.mentions(APP_NOT_FOUND) => {
                    tracing::info!("app not found");
                    Ok(None)
                }
                Err(e) => Err(OperationError::new(
                    Operation::Read,
                    app.as_str(),
                    OperationErrorKind::Read(e),
                )),
            }
        }
        .instrument(span)
        .await
    }

    /// Bring an installed app to the desired spec
    ///
    /// Splunkbase apps are patched in place and re-read until they report
    /// the requested version. Private apps are uninstalled and reinstalled
    /// under a single lock acquisition.
    pub async fn update(
        &self,
        spec: &AppSpec,
        cancel: &CancellationToken,
    ) -> Result<AppId, OperationError> {
        let span = tracing::info_span!(
            "app.update",
            stack = %self.stack,
            app = spec.name(),
            kind = %spec.kind()
        );
        async {
            spec.validate()
                .map_err(|kind| OperationError::new(Operation::Update, spec.name(), kind))?;
            let _guard = self.lock(Operation::Update, spec.name(), cancel).await?;
            match spec {
                AppSpec::Splunkbase(_) => self.patch_locked(spec, cancel).await,
                AppSpec::Private(_) => {
                    let id = spec.id();
                    self.delete_locked(Operation::Update, &id, spec.kind(), cancel)
                        .await?;
                    self.create_locked(spec, cancel).await.map_err(|source| {
                        OperationError::new(
                            Operation::Update,
                            spec.name(),
                            OperationErrorKind::RecreateFailed(Box::new(source)),
                        )
                    })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Uninstall an app and wait until it is gone
    pub async fn delete(
        &self,
        app: &AppId,
        kind: AppKind,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError> {
        let span = tracing::info_span!("app.delete", stack = %self.stack, app = %app, kind = %kind);
        async {
            let _guard = self.lock(Operation::Delete, app.as_str(), cancel).await?;
            self.delete_locked(Operation::Delete, app, kind, cancel).await
        }
        .instrument(span)
        .await
    }

    /// Wait until describing `app` reports a status in `sets.target`
    pub async fn await_state(
        &self,
        app: &AppId,
        kind: AppKind,
        sets: StatusSets,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError> {
        let span = tracing::info_span!(
            "app.poll",
            stack = %self.stack,
            app = %app,
            target = %sets.target
        );
        async {
            let stage = if sets.target.contains(&Status::NOT_FOUND) {
                Stage::AwaitGone
            } else {
                Stage::AwaitExists
            };
            let wait = self.timing.read_wait(sets);
            let policy = self.timing.retry_policy(kind.is_splunkbase());
            self.converge(app, &wait, &policy, stage, cancel)
                .await
                .map_err(|e| {
                    OperationError::new(
                        Operation::Poll,
                        app.as_str(),
                        OperationErrorKind::Converge(e),
                    )
                })
        }
        .instrument(span)
        .await
    }

    async fn lock(
        &self,
        operation: Operation,
        app: &str,
        cancel: &CancellationToken,
    ) -> Result<KeyLockGuard, OperationError> {
        self.locks
            .acquire(self.stack.as_str(), &operation.to_string(), cancel)
            .await
            .map_err(|e| OperationError::new(operation, app, OperationErrorKind::Lock(e)))
    }

    async fn create_locked(
        &self,
        spec: &AppSpec,
        cancel: &CancellationToken,
    ) -> Result<AppId, OperationError> {
        let fail = |reason| {
            enter(Phase::Failed);
            OperationError::new(Operation::Create, spec.name(), reason)
        };
        let policy = self.timing.retry_policy(spec.kind().is_splunkbase());
        let wait = self.timing.write_wait(StatusSets::write());
        let params = spec.install_params();
        let budget = TransientBudget::default();
        let (api, stack, wait, params, budget) = (&self.api, &self.stack, &wait, &params, &budget);

        enter(Phase::Submitting);
        let submitted = retry(&policy, cancel, move || async move {
            let body = spec.request_body().await.map_err(RetryableError::terminal)?;
            enter(Phase::AwaitingAccepted);
            wait_for_state(wait, cancel, move || {
                probes::submit_create(api, stack, params, body.clone(), &wait.sets)
            })
            .await
            .map_err(|e| rules::tag(Stage::Submit, e.into(), budget))
        })
        .await;

        let id = spec.id();
        match submitted {
            Ok(record) => {
                let status = record.as_ref().and_then(|r| r.status.as_deref());
                tracing::info!(app_status = status.unwrap_or("-"), "install accepted");
            }
            Err(RetryError::Terminal(e)) if e.is_conflict() => {
                tracing::info!(%id, "app already exists, adopting it");
            }
            Err(e) => return Err(fail(OperationErrorKind::Submit(e))),
        }

        enter(Phase::AwaitingConverged);
        let exists = self.timing.read_wait(StatusSets::verify_created());
        self.converge(&id, &exists, &policy, Stage::AwaitExists, cancel)
            .await
            .map_err(|e| fail(OperationErrorKind::Converge(e)))?;

        enter(Phase::Converged);
        Ok(id)
    }

    async fn patch_locked(
        &self,
        spec: &AppSpec,
        cancel: &CancellationToken,
    ) -> Result<AppId, OperationError> {
        let fail = |reason| {
            enter(Phase::Failed);
            OperationError::new(Operation::Update, spec.name(), reason)
        };
        let id = spec.id();
        let policy = self.timing.retry_policy(spec.kind().is_splunkbase());
        let wait = self.timing.write_wait(StatusSets::write());
        let params = spec.update_params();
        let budget = TransientBudget::default();
        let (api, stack, app, wait, params, budget) =
            (&self.api, &self.stack, &id, &wait, &params, &budget);

        enter(Phase::Submitting);
        retry(&policy, cancel, move || async move {
            let body = spec.request_body().await.map_err(RetryableError::terminal)?;
            enter(Phase::AwaitingAccepted);
            wait_for_state(wait, cancel, move || {
                probes::submit_update(api, stack, app, params, body.clone(), &wait.sets)
            })
            .await
            .map_err(|e| rules::tag(Stage::Update, e.into(), budget))
        })
        .await
        .map_err(|e| fail(OperationErrorKind::Submit(e)))?;

        let Some(expected) = spec.version() else {
            enter(Phase::Converged);
            return Ok(id);
        };

        enter(Phase::AwaitingConverged);
        let read = self.timing.read_wait(StatusSets::read());
        let read = &read;
        retry(&policy, cancel, move || async move {
            let record: AppRecord = wait_for_state(read, cancel, move || {
                probes::describe(api, stack, app, &read.sets)
            })
            .await
            .map_err(|e| rules::tag(Stage::Verify, e.into(), budget))?;

            let actual = record.version.unwrap_or_default();
            if actual == expected {
                Ok(())
            } else {
                Err(RetryableError::retryable(StepError::VersionMismatch {
                    expected: expected.to_string(),
                    actual,
                }))
            }
        })
        .await
        .map_err(|e| fail(OperationErrorKind::Verify(e)))?;

        enter(Phase::Converged);
        Ok(id)
    }

    async fn delete_locked(
        &self,
        operation: Operation,
        id: &AppId,
        kind: AppKind,
        cancel: &CancellationToken,
    ) -> Result<(), OperationError> {
        let fail = |reason| {
            enter(Phase::Failed);
            OperationError::new(operation, id.as_str(), reason)
        };
        let policy = self.timing.retry_policy(kind.is_splunkbase());
        let submit_policy = policy.scaled(2);
        let wait = self.timing.write_wait(StatusSets::verify_deleted());
        let budget = TransientBudget::default();
        let (api, stack, wait, budget) = (&self.api, &self.stack, &wait, &budget);

        enter(Phase::Submitting);
        retry(&submit_policy, cancel, move || async move {
            wait_for_state(wait, cancel, move || {
                probes::submit_delete(api, stack, id, &wait.sets)
            })
            .await
            .map_err(|e| rules::tag(Stage::AwaitGone, e.into(), budget))
        })
        .await
        .map_err(|e| fail(OperationErrorKind::Submit(e)))?;

        enter(Phase::AwaitingConverged);
        let gone = self.timing.read_wait(StatusSets::verify_deleted());
        self.converge(id, &gone, &policy, Stage::AwaitGone, cancel)
            .await
            .map_err(|e| fail(OperationErrorKind::Converge(e)))?;

        enter(Phase::Converged);
        Ok(())
    }

    /// Poll the describe endpoint, by status alone, until `wait.sets.target`
    async fn converge(
        &self,
        app: &AppId,
        wait: &WaitConfig,
        policy: &RetryPolicy,
        stage: Stage,
        cancel: &CancellationToken,
    ) -> Result<(), RetryError<StepError>> {
        let budget = TransientBudget::default();
        let (api, stack, budget) = (&self.api, &self.stack, &budget);
        retry(policy, cancel, move || async move {
            wait_for_state(wait, cancel, move || {
                probes::describe_status(api, stack, app, &wait.sets)
            })
            .await
            .map_err(|e| rules::tag(stage, e.into(), budget))
        })
        .await
    }

    async fn describe(
        &self,
        app: &AppId,
        wait: &WaitConfig,
        policy: &RetryPolicy,
        stage: Stage,
        cancel: &CancellationToken,
    ) -> Result<AppRecord, RetryError<StepError>> {
        let budget = TransientBudget::default();
        let (api, stack, budget) = (&self.api, &self.stack, &budget);
        retry(policy, cancel, move || async move {
            wait_for_state(wait, cancel, move || {
                probes::describe(api, stack, app, &wait.sets)
            })
            .await
            .map_err(|e| rules::tag(stage, e.into(), budget))
        })
        .await
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
