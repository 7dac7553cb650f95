// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Waiting on remote package validation

use crate::error::{Operation, OperationError, OperationErrorKind};
use crate::probes;
use stackapps_adapters::{ValidationApi, ValidationReport};
use stackapps_core::{wait_for_state, StatusSets, TimingConfig};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Poll a validation request until it reports `success`
///
/// A reported `error`, an unknown status or any non-200 response ends the
/// wait. Nothing is retried.
pub async fn wait_for_validation<V: ValidationApi>(
    api: &V,
    request_id: &str,
    timing: &TimingConfig,
    cancel: &CancellationToken,
) -> Result<ValidationReport, OperationError> {
    let span = tracing::info_span!("app.validate", request_id);
    async {
        let wait = timing.read_wait(StatusSets::validation());
        let report = wait_for_state(&wait, cancel, || probes::validation_status(api, request_id))
            .await
            .map_err(|e| {
                OperationError::new(
                    Operation::Validate,
                    request_id,
                    OperationErrorKind::Validation(e),
                )
            })?;
        tracing::info!(
            errors = report.info.error,
            failures = report.info.failure,
            warnings = report.info.warning,
            pre_vetted = report.is_pre_vetted(),
            "validation finished"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
