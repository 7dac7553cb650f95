// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use serde::Serialize;
use stackapps_adapters::ValidationReport;
use stackapps_engine::AppRecord;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a value as text or pretty JSON
pub fn print<T: Serialize>(value: &T, format: OutputFormat, text: impl FnOnce(&T) -> String) {
    match format {
        OutputFormat::Text => println!("{}", text(value)),
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(value) {
                println!("{}", json);
            }
        }
    }
}

pub fn record_text(record: &AppRecord) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    format!(
        "App: {}\n  Label: {}\n  Version: {}\n  Status: {}",
        record.name,
        field(&record.label),
        field(&record.version),
        field(&record.status)
    )
}

pub fn report_text(report: &ValidationReport) -> String {
    let info = &report.info;
    let mut text = format!(
        "Validation {}: {}\n  errors: {}, failures: {}, warnings: {}, manual checks: {}, passed: {}",
        report.request_id,
        report.status,
        info.error,
        info.failure,
        info.warning,
        info.manual_check,
        info.success
    );
    for link in &report.links {
        text.push_str(&format!("\n  {}: {}", link.rel, link.href));
    }
    text
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
