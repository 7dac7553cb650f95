// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timing knobs for polling and retrying

use crate::retry::RetryPolicy;
use crate::status::StatusSets;
use crate::wait::WaitConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling and retry timings
///
/// Deserializes from a partial table; missing keys take the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// First inter-poll delay for install/update/uninstall submissions
    #[serde(with = "humantime_serde")]
    pub crud_delay: Duration,
    /// First inter-poll delay for reads and existence checks
    #[serde(with = "humantime_serde")]
    pub poll_delay: Duration,
    /// Per-wait timeout
    #[serde(with = "humantime_serde")]
    pub wait_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub min_poll_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub max_poll_interval: Duration,
    /// Retry budget for private app operations
    #[serde(with = "humantime_serde")]
    pub retry_deadline: Duration,
    /// Retry budget for splunkbase app operations
    #[serde(with = "humantime_serde")]
    pub splunkbase_retry_deadline: Duration,
    #[serde(with = "humantime_serde")]
    pub min_backoff: Duration,
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
    /// Limit on a single HTTP exchange with the control plane
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            crud_delay: Duration::from_secs(1),
            poll_delay: Duration::from_secs(2),
            wait_timeout: Duration::from_secs(20 * 60),
            min_poll_interval: Duration::from_secs(3),
            max_poll_interval: Duration::from_secs(10),
            retry_deadline: Duration::from_secs(20 * 60),
            splunkbase_retry_deadline: Duration::from_secs(30 * 60),
            min_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl TimingConfig {
    /// Wait on a submitted install, patch or uninstall
    pub fn write_wait(&self, sets: StatusSets) -> WaitConfig {
        self.wait(sets, self.crud_delay)
    }

    /// Wait on a describe call
    pub fn read_wait(&self, sets: StatusSets) -> WaitConfig {
        self.wait(sets, self.poll_delay)
    }

    /// Retry budget for the given app kind
    pub fn retry_policy(&self, splunkbase: bool) -> RetryPolicy {
        let deadline = if splunkbase {
            self.splunkbase_retry_deadline
        } else {
            self.retry_deadline
        };
        RetryPolicy::new(deadline).with_backoff(self.min_backoff, self.max_backoff)
    }

    fn wait(&self, sets: StatusSets, delay: Duration) -> WaitConfig {
        WaitConfig::new(sets)
            .with_timeout(self.wait_timeout)
            .with_delay(delay)
            .with_min_interval(self.min_poll_interval)
            .with_max_interval(self.max_poll_interval)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
