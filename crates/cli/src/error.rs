// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing error display with context and suggestions

use stackapps_core::{LockError, RetryError, WaitError};
use stackapps_engine::{OperationError, OperationErrorKind, StepError};
use std::fmt;

/// Error with context and recovery suggestions
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Cause chain, outermost first
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Describe any error, adding suggestions for failed app operations
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let mut chain = err.chain();
        let mut cli = CliError::new(chain.next().map(|e| e.to_string()).unwrap_or_default());
        for cause in chain {
            cli = cli.with_context(cause.to_string());
        }
        match err.downcast_ref::<OperationError>() {
            Some(op) => cli.suggest_for(op),
            None => cli,
        }
    }

    fn suggest_for(self, err: &OperationError) -> Self {
        match &err.kind {
            OperationErrorKind::NotPreVetted => self
                .with_suggestion("Validate the package: stackapps validate <request-id>")
                .with_suggestion("Then pass --pre-vetted"),
            OperationErrorKind::RecreateFailed(_) => self
                .with_suggestion(format!(
                    "The app is no longer installed; retry with: stackapps install private --name {}",
                    err.app
                )),
            OperationErrorKind::Lock(LockError::Cancelled { .. }) => self,
            OperationErrorKind::Submit(RetryError::DeadlineExceeded { .. })
            | OperationErrorKind::Converge(RetryError::DeadlineExceeded { .. })
            | OperationErrorKind::Read(RetryError::DeadlineExceeded { .. }) => self
                .with_suggestion("The stack kept reporting transient errors; try again later")
                .with_suggestion("Raise [timing] retry_deadline in stackapps.toml"),
            OperationErrorKind::Submit(e) | OperationErrorKind::Converge(e)
                if matches!(e.last(), Some(StepError::Wait(WaitError::Timeout { .. }))) =>
            {
                self.with_suggestion("Raise [timing] wait_timeout in stackapps.toml")
            }
            _ if err.last_status().and_then(|s| s.code()) == Some(401) => {
                self.with_suggestion("Check that STACKAPPS_TOKEN is valid for this stack")
            }
            _ => self,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
