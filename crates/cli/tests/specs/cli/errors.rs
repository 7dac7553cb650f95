// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error reporting specs

use crate::prelude::*;

#[test]
fn missing_token_is_reported() {
    Project::empty()
        .stackapps()
        .args(["describe", "my_app", "--stack", "acme"])
        .fails()
        .stderr_has("error: no token configured");
}

#[test]
fn missing_stack_is_reported() {
    Project::empty()
        .stackapps()
        .args(["describe", "my_app"])
        .env("STACKAPPS_TOKEN", "t0ken")
        .fails()
        .stderr_has("no stack configured");
}

#[test]
fn unknown_subcommand_fails() {
    Project::empty()
        .stackapps()
        .args(["frobnicate"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn validate_requires_login_token() {
    Project::empty()
        .stackapps()
        .args(["validate", "req-1"])
        .fails()
        .stderr_has("no Splunk login token configured");
}
