// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Admin Config Service client

use super::{AppId, AppsApi, InstallParams, RequestBody, Stack, UpdateParams};
use crate::transport::{HttpRequest, Method};
use async_trait::async_trait;
use stackapps_core::{ApiResponse, TransportError};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_SERVER: &str = "https://admin.splunk.com";

/// Secrets attached to every control plane request
#[derive(Clone, Default)]
pub struct Credentials {
    /// Stack bearer token
    pub token: String,
    /// Splunkbase session, required to install Splunkbase apps
    pub splunkbase_session: Option<String>,
    /// Splunk login token, required to install private apps
    pub splunk_login_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("splunkbase_session", &self.splunkbase_session.as_ref().map(|_| "<redacted>"))
            .field("splunk_login_token", &self.splunk_login_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// ureq-backed client for the ACS v2 victoria app endpoints
#[derive(Clone)]
pub struct AcsClient {
    server: String,
    credentials: Arc<Credentials>,
    user_agent: String,
    agent: ureq::Agent,
}

impl AcsClient {
    pub fn new(server: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            server: server.into().trim_end_matches('/').to_string(),
            credentials: Arc::new(credentials),
            user_agent: format!("ACS-stackapps-{}", env!("CARGO_PKG_VERSION")),
            agent: crate::transport::agent(Duration::from_secs(120)),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.agent = crate::transport::agent(timeout);
        self
    }

    fn apps_url(&self, stack: &Stack) -> String {
        format!("{}/{}/adminconfig/v2/apps/victoria", self.server, stack)
    }

    fn app_url(&self, stack: &Stack, app: &AppId) -> String {
        format!("{}/{}", self.apps_url(stack), app)
    }

    fn request(&self, method: Method, url: String) -> Result<HttpRequest, TransportError> {
        if self.credentials.token.trim().is_empty() {
            return Err(TransportError::InvalidRequest(
                "provide a valid token".to_string(),
            ));
        }
        let mut request = HttpRequest::new(method, url)
            .with_header("Authorization", format!("Bearer {}", self.credentials.token))
            .with_header("User-Agent", self.user_agent.clone());
        if let Some(session) = &self.credentials.splunkbase_session {
            request = request.with_header("X-Splunkbase-Authorization", session.clone());
        }
        if let Some(token) = &self.credentials.splunk_login_token {
            request = request.with_header("X-Splunk-Authorization", token.clone());
        }
        Ok(request)
    }

    fn create_request(
        &self,
        stack: &Stack,
        params: &InstallParams,
        body: RequestBody,
    ) -> Result<HttpRequest, TransportError> {
        let url = format!(
            "{}?splunkbase={}",
            self.apps_url(stack),
            params.kind.is_splunkbase()
        );
        let mut request = self.request(Method::Post, url)?;
        if let Some(ack) = &params.licensing_ack {
            request = request.with_header("ACS-Licensing-Ack", ack.clone());
        }
        if let Some(ack) = &params.legal_ack {
            request = request.with_header("ACS-Legal-Ack", ack.clone());
        }
        Ok(request.with_body(body))
    }

    fn update_request(
        &self,
        stack: &Stack,
        app: &AppId,
        params: &UpdateParams,
        body: RequestBody,
    ) -> Result<HttpRequest, TransportError> {
        let mut request = self.request(Method::Patch, self.app_url(stack, app))?;
        if let Some(ack) = &params.licensing_ack {
            request = request.with_header("ACS-Licensing-Ack", ack.clone());
        }
        Ok(request.with_body(body))
    }
}

#[async_trait]
impl AppsApi for AcsClient {
    async fn submit_create(
        &self,
        stack: &Stack,
        params: &InstallParams,
        body: RequestBody,
    ) -> Result<ApiResponse, TransportError> {
        let request = self.create_request(stack, params, body)?;
        request.send(&self.agent).await
    }

    async fn describe(&self, stack: &Stack, app: &AppId) -> Result<ApiResponse, TransportError> {
        let request = self.request(Method::Get, self.app_url(stack, app))?;
        request.send(&self.agent).await
    }

    async fn submit_update(
        &self,
        stack: &Stack,
        app: &AppId,
        params: &UpdateParams,
        body: RequestBody,
    ) -> Result<ApiResponse, TransportError> {
        let request = self.update_request(stack, app, params, body)?;
        request.send(&self.agent).await
    }

    async fn submit_delete(
        &self,
        stack: &Stack,
        app: &AppId,
    ) -> Result<ApiResponse, TransportError> {
        let request = self.request(Method::Delete, self.app_url(stack, app))?;
        request.send(&self.agent).await
    }
}

#[cfg(test)]
#[path = "acs_tests.rs"]
mod tests;
