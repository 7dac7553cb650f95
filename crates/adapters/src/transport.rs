// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking HTTP exchanges run off the async executor

use crate::apps::RequestBody;
use stackapps_core::{ApiResponse, TransportError};
use std::time::Duration;

/// Agent that reports every HTTP status as a response, never as an error
pub(crate) fn agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build()
        .into()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// A fully described request, built before any I/O happens
#[derive(Clone, Debug)]
pub(crate) struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(method: Method, url: String) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: &'static str, value: String) -> Self {
        self.headers.push((name, value));
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Perform the exchange on the blocking pool
    pub async fn send(self, agent: &ureq::Agent) -> Result<ApiResponse, TransportError> {
        let agent = agent.clone();
        tokio::task::spawn_blocking(move || self.send_blocking(&agent))
            .await
            .map_err(|e| TransportError::Request(format!("request task failed: {e}")))?
    }

    fn send_blocking(self, agent: &ureq::Agent) -> Result<ApiResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = self;

        let result = match method {
            Method::Get => with_headers(agent.get(&url), &headers).call(),
            Method::Delete => with_headers(agent.delete(&url), &headers).call(),
            Method::Post | Method::Patch => {
                let builder = if method == Method::Post {
                    agent.post(&url)
                } else {
                    agent.patch(&url)
                };
                let builder = with_headers(builder, &headers);
                match body {
                    Some(RequestBody::Form(fields)) => builder.send_form(fields),
                    Some(RequestBody::Package(bytes)) => builder
                        .content_type("application/octet-stream")
                        .send(&bytes[..]),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| TransportError::Request(e.to_string()))?;
        let code = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(ApiResponse {
            code,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(&'static str, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(*name, value.as_str());
    }
    builder
}
