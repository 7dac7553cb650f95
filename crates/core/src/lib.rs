// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! stackapps-core: reconciliation primitives for asynchronous app operations
//!
//! This crate provides:
//! - The status vocabulary and per-operation status sets
//! - Classification of raw responses into observations
//! - A state poller, a deadline-bounded retry policy, and per-key locking
//! - Timing configuration

pub mod classify;
pub mod config;
pub mod error;
pub mod locks;
pub mod response;
pub mod retry;
pub mod status;
pub mod wait;

pub use classify::{classify, classify_status, classify_submission, observe};
pub use config::TimingConfig;
pub use error::{ApiError, TransportError};
pub use locks::{KeyLockGuard, KeyLockManager, LockError};
pub use response::{ApiResponse, REQUEST_ID};
pub use retry::{retry, RetryError, RetryPolicy, RetryableError};
pub use status::{Partition, Status, StatusSet, StatusSets};
pub use wait::{wait_for_state, Observation, WaitConfig, WaitError};
