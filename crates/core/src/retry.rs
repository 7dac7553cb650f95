// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline-bounded retry of a fallible unit of work

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How long to keep retrying and how to back off between attempts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Overall budget across every attempt, including attempts in flight
    #[serde(with = "humantime_serde")]
    pub deadline: Duration,
    #[serde(with = "humantime_serde")]
    pub min_backoff: Duration,
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(deadline: Duration) -> Self {
        Self {
            deadline,
            min_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }

    pub fn with_backoff(mut self, min: Duration, max: Duration) -> Self {
        self.min_backoff = min;
        self.max_backoff = max.max(min);
        self
    }

    /// Same backoff with the deadline multiplied by `factor`
    pub fn scaled(&self, factor: u32) -> Self {
        Self {
            deadline: self.deadline.saturating_mul(factor),
            ..self.clone()
        }
    }
}

/// A failed attempt, tagged with whether another attempt may help
#[derive(Debug)]
pub struct RetryableError<E> {
    pub error: E,
    pub retryable: bool,
}

impl<E> RetryableError<E> {
    pub fn retryable(error: E) -> Self {
        Self {
            error,
            retryable: true,
        }
    }

    pub fn terminal(error: E) -> Self {
        Self {
            error,
            retryable: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum RetryError<E: std::error::Error + 'static> {
    /// A non-retryable failure, returned as-is
    #[error(transparent)]
    Terminal(E),

    #[error("gave up after {deadline:?}{}", last_suffix(.last))]
    DeadlineExceeded { deadline: Duration, last: Option<E> },

    #[error("retry cancelled")]
    Cancelled,
}

impl<E: std::error::Error + 'static> RetryError<E> {
    /// The most recent underlying failure, if any attempt completed
    pub fn last(&self) -> Option<&E> {
        match self {
            RetryError::Terminal(e) => Some(e),
            RetryError::DeadlineExceeded { last, .. } => last.as_ref(),
            RetryError::Cancelled => None,
        }
    }
}

fn last_suffix<E: Display>(last: &Option<E>) -> String {
    match last {
        Some(e) => format!(": {e}"),
        None => String::new(),
    }
}

/// Run `unit` until it succeeds, fails terminally, or the deadline passes
///
/// Each attempt runs under the remaining deadline; an attempt still in flight
/// when the deadline passes is dropped. Backoff doubles from `min_backoff` to
/// `max_backoff` and never sleeps past the deadline.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut unit: F,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RetryableError<E>>>,
{
    let deadline = Instant::now() + policy.deadline;
    let mut backoff = policy.min_backoff;
    let mut last = None;
    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            return Err(RetryError::Cancelled);
        }
        if attempt > 0 && Instant::now() >= deadline {
            return Err(RetryError::DeadlineExceeded {
                deadline: policy.deadline,
                last,
            });
        }

        // A zero deadline still gets one unbounded attempt
        let bounded = attempt > 0 || !policy.deadline.is_zero();
        attempt += 1;
        let run = unit();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            outcome = async {
                if bounded {
                    tokio::time::timeout_at(deadline, run).await.ok()
                } else {
                    Some(run.await)
                }
            } => outcome,
        };

        let failure = match outcome {
            Some(Ok(value)) => return Ok(value),
            Some(Err(failure)) => failure,
            None => {
                tracing::warn!(attempt, "attempt still running at retry deadline");
                return Err(RetryError::DeadlineExceeded {
                    deadline: policy.deadline,
                    last,
                });
            }
        };

        if !failure.retryable {
            return Err(RetryError::Terminal(failure.error));
        }

        let pause = backoff.min(deadline.saturating_duration_since(Instant::now()));
        tracing::warn!(
            attempt,
            error = %failure.error,
            backoff_ms = pause.as_millis() as u64,
            "retrying after transient error"
        );
        last = Some(failure.error);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            _ = tokio::time::sleep(pause) => {}
        }
        backoff = (backoff * 2).min(policy.max_backoff);
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
