// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake validation API for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ValidationApi, ValidationReport};
use async_trait::async_trait;
use stackapps_core::{ApiResponse, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted validation API; the last reply repeats
#[derive(Clone, Default)]
pub struct FakeValidationApi {
    replies: Arc<Mutex<VecDeque<ApiResponse>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeValidationApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a 200 response carrying `report`
    pub fn report(&self, report: &ValidationReport) -> &Self {
        let body = serde_json::to_vec(report).unwrap_or_default();
        self.respond(ApiResponse::new(200, body))
    }

    /// Queue a 200 response with the given status and clean counts
    pub fn status(&self, request_id: &str, status: &str) -> &Self {
        self.report(&ValidationReport {
            request_id: request_id.to_string(),
            status: status.to_string(),
            ..ValidationReport::default()
        })
    }

    pub fn respond(&self, response: ApiResponse) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
        self
    }

    /// Request ids queried so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl ValidationApi for FakeValidationApi {
    async fn check_validation_status(
        &self,
        request_id: &str,
    ) -> Result<ApiResponse, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request_id.to_string());

        let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        Ok(reply.unwrap_or_else(|| ApiResponse::new(404, "validation request not found")))
    }
}
