// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-key mutual exclusion for mutating operations
//!
//! Each key maps to a reference-counted entry holding an async mutex. The
//! entry exists only while some caller has reserved it and is removed on the
//! last release, so the table never grows with the number of keys ever seen.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("cancelled while waiting for lock on {key}")]
    Cancelled { key: String },
}

#[derive(Debug)]
struct LockEntry {
    mutex: Arc<Mutex<()>>,
    refs: usize,
}

type LockTable = Arc<RwLock<HashMap<String, LockEntry>>>;

/// Serializes operations that share a key
///
/// Cheap to clone; clones share the same table.
#[derive(Clone, Debug, Default)]
pub struct KeyLockManager {
    table: LockTable,
}

impl KeyLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive ownership of `key`
    ///
    /// The returned guard releases the key when dropped. Dropping the
    /// returned future before it resolves gives back the reservation.
    pub async fn acquire(
        &self,
        key: &str,
        operation: &str,
        cancel: &CancellationToken,
    ) -> Result<KeyLockGuard, LockError> {
        tracing::info!(key, operation, "acquiring lock");
        let started = Instant::now();
        let reservation = self.reserve(key);
        let mutex = Arc::clone(&reservation.mutex);

        let held = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(key, operation, "lock wait cancelled");
                return Err(LockError::Cancelled { key: key.to_string() });
            }
            held = mutex.lock_owned() => held,
        };

        tracing::info!(
            key,
            operation,
            waited_ms = started.elapsed().as_millis() as u64,
            "lock acquired"
        );
        Ok(KeyLockGuard {
            _held: held,
            reservation,
            operation: operation.to_string(),
            acquired_at: Instant::now(),
        })
    }

    /// Run `fut` while holding `key`
    ///
    /// The key is released on every exit path, including a panic inside `fut`
    /// or the returned future being dropped.
    pub async fn with_lock<T, Fut>(
        &self,
        key: &str,
        operation: &str,
        cancel: &CancellationToken,
        fut: Fut,
    ) -> Result<T, LockError>
    where
        Fut: Future<Output = T>,
    {
        let guard = self.acquire(key, operation, cancel).await?;
        let output = fut.await;
        guard.release();
        Ok(output)
    }

    /// Number of keys currently reserved or held
    pub fn len(&self) -> usize {
        self.table.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Holders plus waiters for `key`
    pub fn ref_count(&self, key: &str) -> usize {
        self.table
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .map_or(0, |entry| entry.refs)
    }

    fn reserve(&self, key: &str) -> Reservation {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        let entry = table.entry(key.to_string()).or_insert_with(|| LockEntry {
            mutex: Arc::new(Mutex::new(())),
            refs: 0,
        });
        entry.refs += 1;
        Reservation {
            table: Arc::clone(&self.table),
            key: key.to_string(),
            mutex: Arc::clone(&entry.mutex),
        }
    }
}

/// One counted reference to a table entry; checks in on drop
struct Reservation {
    table: LockTable,
    key: String,
    mutex: Arc<Mutex<()>>,
}

impl Drop for Reservation {
    fn drop(&mut self) {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = table.get_mut(&self.key) {
            entry.refs = entry.refs.saturating_sub(1);
            if entry.refs == 0 {
                table.remove(&self.key);
            }
        }
    }
}

/// Exclusive ownership of one key
///
/// Field order matters: the mutex unlocks before the reservation checks in.
pub struct KeyLockGuard {
    _held: OwnedMutexGuard<()>,
    reservation: Reservation,
    operation: String,
    acquired_at: Instant,
}

impl KeyLockGuard {
    pub fn key(&self) -> &str {
        &self.reservation.key
    }

    pub fn release(self) {
        drop(self);
    }
}

impl Drop for KeyLockGuard {
    fn drop(&mut self) {
        tracing::info!(
            key = %self.reservation.key,
            operation = %self.operation,
            held_ms = self.acquired_at.elapsed().as_millis() as u64,
            "lock released"
        );
    }
}

impl std::fmt::Debug for KeyLockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyLockGuard")
            .field("key", &self.reservation.key)
            .field("operation", &self.operation)
            .finish()
    }
}

#[cfg(test)]
#[path = "locks_tests.rs"]
mod tests;
