// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AppInspect validation status client

use super::ValidationApi;
use crate::transport::{HttpRequest, Method};
use async_trait::async_trait;
use stackapps_core::{ApiResponse, TransportError};
use std::time::Duration;

pub const APPINSPECT_URL: &str = "https://appinspect.splunk.com/v1/app/validate";

#[derive(Clone)]
pub struct AppInspectClient {
    base_url: String,
    login_token: String,
    agent: ureq::Agent,
}

impl AppInspectClient {
    pub fn new(login_token: &str) -> Self {
        Self {
            base_url: APPINSPECT_URL.to_string(),
            login_token: login_token.trim().to_string(),
            agent: crate::transport::agent(Duration::from_secs(60)),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.agent = crate::transport::agent(timeout);
        self
    }

    fn status_request(&self, request_id: &str) -> Result<HttpRequest, TransportError> {
        if self.login_token.is_empty() {
            return Err(TransportError::InvalidRequest(
                "authorization token cannot be empty".to_string(),
            ));
        }
        let request_id = request_id.trim();
        if request_id.is_empty() {
            return Err(TransportError::InvalidRequest(
                "validation ID cannot be empty".to_string(),
            ));
        }
        Ok(HttpRequest::new(
            Method::Get,
            format!("{}/status/{}", self.base_url, request_id),
        )
        .with_header("Cache-Control", "no-cache".to_string())
        .with_header("Authorization", format!("bearer {}", self.login_token)))
    }
}

#[async_trait]
impl ValidationApi for AppInspectClient {
    async fn check_validation_status(
        &self,
        request_id: &str,
    ) -> Result<ApiResponse, TransportError> {
        let request = self.status_request(request_id)?;
        request.send(&self.agent).await
    }
}

#[cfg(test)]
#[path = "appinspect_tests.rs"]
mod tests;
