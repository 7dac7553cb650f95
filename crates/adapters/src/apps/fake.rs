// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake apps API for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{AppId, AppsApi, InstallParams, RequestBody, Stack, UpdateParams};
use async_trait::async_trait;
use stackapps_core::{ApiResponse, TransportError};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Which endpoint a scripted reply answers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppsOp {
    Create,
    Describe,
    Update,
    Delete,
}

/// Recorded apps API call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppsCall {
    Create {
        stack: Stack,
        params: InstallParams,
        body: RequestBody,
    },
    Describe {
        stack: Stack,
        app: AppId,
    },
    Update {
        stack: Stack,
        app: AppId,
        params: UpdateParams,
        body: RequestBody,
    },
    Delete {
        stack: Stack,
        app: AppId,
    },
}

impl AppsCall {
    pub fn op(&self) -> AppsOp {
        match self {
            AppsCall::Create { .. } => AppsOp::Create,
            AppsCall::Describe { .. } => AppsOp::Describe,
            AppsCall::Update { .. } => AppsOp::Update,
            AppsCall::Delete { .. } => AppsOp::Delete,
        }
    }
}

/// One scripted outcome
#[derive(Clone, Debug)]
pub enum FakeReply {
    Response(ApiResponse),
    TransportFailure(String),
}

/// Scripted apps API
///
/// Replies are queued per endpoint and consumed in order; the last reply of
/// a queue repeats. An endpoint with nothing scripted answers 500.
#[derive(Clone, Default)]
pub struct FakeAppsApi {
    replies: Arc<Mutex<HashMap<AppsOp, VecDeque<FakeReply>>>>,
    calls: Arc<Mutex<Vec<AppsCall>>>,
}

impl FakeAppsApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status code and body
    pub fn respond(&self, op: AppsOp, code: u16, body: &str) -> &Self {
        self.push(op, FakeReply::Response(ApiResponse::new(code, body)))
    }

    /// Queue a transport failure
    pub fn fail_transport(&self, op: AppsOp, message: &str) -> &Self {
        self.push(op, FakeReply::TransportFailure(message.to_string()))
    }

    pub fn push(&self, op: AppsOp, reply: FakeReply) -> &Self {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(op)
            .or_default()
            .push_back(reply);
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<AppsCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of calls made to one endpoint
    pub fn call_count(&self, op: AppsOp) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|call| call.op() == op)
            .count()
    }

    fn reply(&self, call: AppsCall) -> Result<ApiResponse, TransportError> {
        let op = call.op();
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);

        let mut replies = self.replies.lock().unwrap_or_else(|e| e.into_inner());
        let queue = replies.entry(op).or_default();
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        match reply {
            Some(FakeReply::Response(response)) => Ok(response),
            Some(FakeReply::TransportFailure(message)) => Err(TransportError::Request(message)),
            None => Ok(ApiResponse::new(500, format!("no reply scripted for {:?}", op))),
        }
    }
}

#[async_trait]
impl AppsApi for FakeAppsApi {
    async fn submit_create(
        &self,
        stack: &Stack,
        params: &InstallParams,
        body: RequestBody,
    ) -> Result<ApiResponse, TransportError> {
        self.reply(AppsCall::Create {
            stack: stack.clone(),
            params: params.clone(),
            body,
        })
    }

    async fn describe(&self, stack: &Stack, app: &AppId) -> Result<ApiResponse, TransportError> {
        self.reply(AppsCall::Describe {
            stack: stack.clone(),
            app: app.clone(),
        })
    }

    async fn submit_update(
        &self,
        stack: &Stack,
        app: &AppId,
        params: &UpdateParams,
        body: RequestBody,
    ) -> Result<ApiResponse, TransportError> {
        self.reply(AppsCall::Update {
            stack: stack.clone(),
            app: app.clone(),
            params: params.clone(),
            body,
        })
    }

    async fn submit_delete(
        &self,
        stack: &Stack,
        app: &AppId,
    ) -> Result<ApiResponse, TransportError> {
        self.reply(AppsCall::Delete {
            stack: stack.clone(),
            app: app.clone(),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
