// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP-shaped responses returned by collaborator APIs

use crate::status::Status;
use http::header::{HeaderMap, HeaderName, HeaderValue};

/// Header carrying the control plane's request correlation id
pub const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// A completed HTTP exchange with its body fully read
#[derive(Clone, Debug, Default)]
pub struct ApiResponse {
    pub code: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Attach a request correlation id (ignored if not a valid header value)
    pub fn with_request_id(mut self, id: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(id) {
            self.headers.insert(REQUEST_ID, value);
        }
        self
    }

    pub fn status(&self) -> Status {
        Status::from_code(self.code)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.headers.get(REQUEST_ID).and_then(|v| v.to_str().ok())
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
