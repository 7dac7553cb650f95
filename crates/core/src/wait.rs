// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State-change wait engine
//!
//! Polls a probe until it reports a target status, reports a status outside
//! the operation's partition (hard failure), or the timeout elapses. Every
//! suspension point races the caller's cancellation token.

use crate::error::ApiError;
use crate::status::{Partition, Status, StatusSet, StatusSets};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Result of a single probe invocation
///
/// A probe that could not complete the exchange at all returns `Err` instead.
#[derive(Debug)]
pub struct Observation<T> {
    pub payload: Option<T>,
    pub status: Status,
    pub error: Option<ApiError>,
}

impl<T> Observation<T> {
    /// Status with a decoded payload
    pub fn with_payload(status: Status, payload: T) -> Self {
        Self {
            payload: Some(payload),
            status,
            error: None,
        }
    }

    /// Status alone, typically a pending one
    pub fn status(status: Status) -> Self {
        Self {
            payload: None,
            status,
            error: None,
        }
    }

    /// Status accompanied by the error that explains it
    pub fn failure(status: Status, error: ApiError) -> Self {
        Self {
            payload: None,
            status,
            error: Some(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Observation<U> {
        Observation {
            payload: self.payload.map(f),
            status: self.status,
            error: self.error,
        }
    }
}

/// Poll loop parameters
#[derive(Clone, Debug)]
pub struct WaitConfig {
    pub sets: StatusSets,
    /// Give up once this much time has elapsed without reaching a target
    pub timeout: Duration,
    /// First inter-poll delay
    pub delay: Duration,
    /// Lower bound for any inter-poll delay
    pub min_interval: Duration,
    /// Upper bound the delay grows to on successive pending results
    pub max_interval: Duration,
}

impl WaitConfig {
    pub fn new(sets: StatusSets) -> Self {
        Self {
            sets,
            timeout: Duration::from_secs(20 * 60),
            delay: Duration::from_secs(1),
            min_interval: Duration::from_secs(3),
            max_interval: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<(), WaitError> {
        if !self.sets.is_disjoint() {
            return Err(WaitError::InvalidConfig(format!(
                "pending {} and target {} overlap",
                self.sets.pending, self.sets.target
            )));
        }
        if self.sets.target.is_empty() {
            return Err(WaitError::InvalidConfig("no target status".to_string()));
        }
        if self.timeout <= self.delay {
            return Err(WaitError::InvalidConfig(format!(
                "timeout {:?} must exceed delay {:?}",
                self.timeout, self.delay
            )));
        }
        if self.min_interval > self.max_interval {
            return Err(WaitError::InvalidConfig(format!(
                "min interval {:?} exceeds max interval {:?}",
                self.min_interval, self.max_interval
            )));
        }
        Ok(())
    }

    fn first_interval(&self) -> Duration {
        self.delay.clamp(self.min_interval, self.max_interval)
    }
}

/// Errors from the wait engine
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("request failed: {0}")]
    Request(#[source] ApiError),

    #[error("{source} (status: {status})")]
    Failed {
        status: Status,
        #[source]
        source: ApiError,
    },

    #[error("unexpected status {status}, waiting for {expected}")]
    UnexpectedStatus { status: Status, expected: StatusSet },

    #[error("status {status} carried no payload")]
    MissingPayload { status: Status },

    #[error("timed out after {timeout:?} {}", describe_last(.last_status, .last_error))]
    Timeout {
        timeout: Duration,
        last_status: Option<Status>,
        last_error: Option<String>,
    },

    #[error("wait cancelled")]
    Cancelled,

    #[error("invalid wait configuration: {0}")]
    InvalidConfig(String),
}

impl WaitError {
    /// The classified API error behind this failure, if any
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            WaitError::Request(source) | WaitError::Failed { source, .. } => Some(source),
            _ => None,
        }
    }

    /// HTTP code of the status that ended the wait, if any
    pub fn code(&self) -> Option<u16> {
        match self {
            WaitError::Failed { status, source } => source.code().or_else(|| status.code()),
            WaitError::Request(source) => source.code(),
            WaitError::UnexpectedStatus { status, .. } => status.code(),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.api_error().is_some_and(ApiError::is_conflict)
    }

    pub fn mentions(&self, reason: &str) -> bool {
        self.api_error().is_some_and(|e| e.mentions(reason))
    }
}

fn describe_last(status: &Option<Status>, error: &Option<String>) -> String {
    match (status, error) {
        (Some(status), Some(error)) => format!("(last status: {status}, last error: {error})"),
        (Some(status), None) => format!("(last status: {status})"),
        (None, Some(error)) => format!("(last error: {error})"),
        (None, None) => "(no status observed)".to_string(),
    }
}

/// Poll `probe` until the configured target status is observed
///
/// The first probe runs immediately. Pending results sleep for the current
/// interval, which starts at `delay` (bounded by `min_interval`) and doubles
/// up to `max_interval`; sleeps never run past the timeout.
pub async fn wait_for_state<T, F, Fut>(
    config: &WaitConfig,
    cancel: &CancellationToken,
    mut probe: F,
) -> Result<T, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Observation<T>, ApiError>>,
{
    config.validate()?;

    let started = Instant::now();
    let mut interval = config.first_interval();
    let mut last_status = None;
    let mut last_error = None;
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(WaitError::Cancelled);
        }

        attempt += 1;
        let observation = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(WaitError::Cancelled),
            observation = probe() => observation.map_err(WaitError::Request)?,
        };

        let Observation {
            payload,
            status,
            error,
        } = observation;

        match config.sets.partition(&status) {
            Partition::Target => {
                tracing::debug!(%status, attempt, "target status reached");
                return payload.ok_or(WaitError::MissingPayload { status });
            }
            Partition::Pending => {
                tracing::trace!(%status, attempt, "still pending");
                last_error = error.map(|e| e.to_string());
                last_status = Some(status);
            }
            Partition::Failure => {
                tracing::debug!(%status, attempt, "unexpected status");
                return Err(match error {
                    Some(source) => WaitError::Failed { status, source },
                    None => WaitError::UnexpectedStatus {
                        status,
                        expected: config.sets.target.clone(),
                    },
                });
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= config.timeout {
            return Err(WaitError::Timeout {
                timeout: config.timeout,
                last_status,
                last_error,
            });
        }

        let pause = interval.min(config.timeout - elapsed);
        tracing::debug!(attempt, delay_ms = pause.as_millis() as u64, "waiting before next poll");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(WaitError::Cancelled),
            _ = tokio::time::sleep(pause) => {}
        }
        interval = (interval * 2).min(config.max_interval);
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
