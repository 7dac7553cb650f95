// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::apps::{AppId, AppsApi, InstallParams, RequestBody, Stack, UpdateParams};
use crate::validation::ValidationApi;
use async_trait::async_trait;
use stackapps_core::{ApiResponse, TransportError};
use std::time::Instant;
use tracing::Instrument;

fn log_outcome(result: &Result<ApiResponse, TransportError>, started: Instant) {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(response) => tracing::info!(
            code = response.code,
            request_id = response.request_id().unwrap_or("-"),
            elapsed_ms,
            "response"
        ),
        Err(e) => tracing::error!(elapsed_ms, error = %e, "request failed"),
    }
}

/// Wrapper that adds tracing to any AppsApi
#[derive(Clone)]
pub struct TracedAppsApi<A> {
    inner: A,
}

impl<A> TracedAppsApi<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: AppsApi> AppsApi for TracedAppsApi<A> {
    async fn submit_create(
        &self,
        stack: &Stack,
        params: &InstallParams,
        body: RequestBody,
    ) -> Result<ApiResponse, TransportError> {
        let span = tracing::info_span!("acs.install", %stack, kind = %params.kind);
        async {
            tracing::info!(
                content_type = body.content_type(),
                body_len = body.len(),
                "submitting install"
            );
            let started = Instant::now();
            let result = self.inner.submit_create(stack, params, body).await;
            log_outcome(&result, started);
            result
        }
        .instrument(span)
        .await
    }

    async fn describe(&self, stack: &Stack, app: &AppId) -> Result<ApiResponse, TransportError> {
        let span = tracing::debug_span!("acs.describe", %stack, %app);
        async {
            let started = Instant::now();
            let result = self.inner.describe(stack, app).await;
            match &result {
                Ok(response) => tracing::debug!(
                    code = response.code,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "described"
                ),
                Err(e) => tracing::warn!(error = %e, "describe failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn submit_update(
        &self,
        stack: &Stack,
        app: &AppId,
        params: &UpdateParams,
        body: RequestBody,
    ) -> Result<ApiResponse, TransportError> {
        let span = tracing::info_span!("acs.patch", %stack, %app);
        async {
            tracing::info!(body_len = body.len(), "submitting patch");
            let started = Instant::now();
            let result = self.inner.submit_update(stack, app, params, body).await;
            log_outcome(&result, started);
            result
        }
        .instrument(span)
        .await
    }

    async fn submit_delete(
        &self,
        stack: &Stack,
        app: &AppId,
    ) -> Result<ApiResponse, TransportError> {
        let span = tracing::info_span!("acs.uninstall", %stack, %app);
        async {
            tracing::info!("submitting uninstall");
            let started = Instant::now();
            let result = self.inner.submit_delete(stack, app).await;
            log_outcome(&result, started);
            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ValidationApi
#[derive(Clone)]
pub struct TracedValidationApi<V> {
    inner: V,
}

impl<V> TracedValidationApi<V> {
    pub fn new(inner: V) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<V: ValidationApi> ValidationApi for TracedValidationApi<V> {
    async fn check_validation_status(
        &self,
        request_id: &str,
    ) -> Result<ApiResponse, TransportError> {
        let span = tracing::debug_span!("appinspect.status", request_id);
        async {
            let started = Instant::now();
            let result = self.inner.check_validation_status(request_id).await;
            log_outcome(&result, started);
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
