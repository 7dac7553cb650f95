// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status vocabulary for asynchronous operations
//!
//! A status is either an HTTP status, rendered with its canonical reason text
//! ("OK", "Accepted", "Too Many Requests", ...), or one of the domain statuses
//! reported by long-running remote jobs ("success", "processing", "error").
//! Each operation partitions the vocabulary into pending, target and
//! implicit-failure statuses via [`StatusSets`].

use http::StatusCode;
use std::fmt;

/// A logical status observed by one probe
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    /// HTTP status of a completed exchange
    Http(StatusCode),
    /// Remote job finished successfully
    Success,
    /// Remote job still running
    Processing,
    /// Remote job failed
    Error,
    /// Domain status outside the known vocabulary
    Unrecognized(String),
}

impl Status {
    pub const OK: Status = Status::Http(StatusCode::OK);
    pub const ACCEPTED: Status = Status::Http(StatusCode::ACCEPTED);
    pub const BAD_REQUEST: Status = Status::Http(StatusCode::BAD_REQUEST);
    pub const NOT_FOUND: Status = Status::Http(StatusCode::NOT_FOUND);
    pub const CONFLICT: Status = Status::Http(StatusCode::CONFLICT);
    pub const FAILED_DEPENDENCY: Status = Status::Http(StatusCode::FAILED_DEPENDENCY);
    pub const TOO_MANY_REQUESTS: Status = Status::Http(StatusCode::TOO_MANY_REQUESTS);
    pub const SERVICE_UNAVAILABLE: Status = Status::Http(StatusCode::SERVICE_UNAVAILABLE);

    /// Map a numeric HTTP code to a status
    pub fn from_code(code: u16) -> Self {
        match StatusCode::from_u16(code) {
            Ok(code) => Status::Http(code),
            Err(_) => Status::Unrecognized(code.to_string()),
        }
    }

    /// Parse a domain status reported in a job body (case and whitespace insensitive)
    pub fn parse_domain(text: &str) -> Self {
        let normalized = text.trim().to_lowercase();
        match normalized.as_str() {
            "success" => Status::Success,
            "processing" => Status::Processing,
            "error" => Status::Error,
            _ => Status::Unrecognized(normalized),
        }
    }

    /// Numeric HTTP code, if this is an HTTP status
    pub fn code(&self) -> Option<u16> {
        match self {
            Status::Http(code) => Some(code.as_u16()),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Http(code) => f.write_str(code.canonical_reason().unwrap_or(code.as_str())),
            Status::Success => f.write_str("success"),
            Status::Processing => f.write_str("processing"),
            Status::Error => f.write_str("error"),
            Status::Unrecognized(text) => f.write_str(text),
        }
    }
}

/// Small ordered set of statuses
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSet(Vec<Status>);

impl StatusSet {
    pub fn new(statuses: impl IntoIterator<Item = Status>) -> Self {
        let mut set = Self::default();
        for status in statuses {
            if !set.contains(&status) {
                set.0.push(status);
            }
        }
        set
    }

    pub fn contains(&self, status: &Status) -> bool {
        self.0.contains(status)
    }

    pub fn is_disjoint(&self, other: &StatusSet) -> bool {
        !self.0.iter().any(|s| other.contains(s))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Status> {
        self.0.iter()
    }
}

impl fmt::Display for StatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Which side of an operation's partition a status falls on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Partition {
    /// Keep polling
    Pending,
    /// Converged
    Target,
    /// Anything the operation does not recognize
    Failure,
}

/// Pending and target statuses declared by one operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSets {
    pub pending: StatusSet,
    pub target: StatusSet,
}

impl StatusSets {
    pub fn new(pending: StatusSet, target: StatusSet) -> Self {
        Self { pending, target }
    }

    /// Submission of an install or patch: accepted once the request is taken
    pub fn write() -> Self {
        Self::new(
            StatusSet::new([Status::TOO_MANY_REQUESTS, Status::FAILED_DEPENDENCY]),
            StatusSet::new([Status::ACCEPTED, Status::OK]),
        )
    }

    /// The app becomes visible after an install
    pub fn verify_created() -> Self {
        Self::new(
            StatusSet::new([Status::FAILED_DEPENDENCY, Status::TOO_MANY_REQUESTS]),
            StatusSet::new([Status::OK]),
        )
    }

    /// The app disappears after an uninstall
    pub fn verify_deleted() -> Self {
        Self::new(
            StatusSet::new([Status::OK, Status::TOO_MANY_REQUESTS]),
            StatusSet::new([Status::NOT_FOUND]),
        )
    }

    /// Describe an existing app
    pub fn read() -> Self {
        Self::new(
            StatusSet::new([Status::TOO_MANY_REQUESTS, Status::FAILED_DEPENDENCY]),
            StatusSet::new([Status::OK]),
        )
    }

    /// Remote validation job
    pub fn validation() -> Self {
        Self::new(
            StatusSet::new([Status::Processing]),
            StatusSet::new([Status::Success]),
        )
    }

    pub fn partition(&self, status: &Status) -> Partition {
        if self.target.contains(status) {
            Partition::Target
        } else if self.pending.contains(status) {
            Partition::Pending
        } else {
            Partition::Failure
        }
    }

    pub fn is_disjoint(&self) -> bool {
        self.pending.is_disjoint(&self.target)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
