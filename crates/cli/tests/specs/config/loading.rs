// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config file specs

use crate::prelude::*;

#[test]
fn explicit_config_must_exist() {
    let project = Project::empty();
    let missing = project.path().join("nope.toml");

    project
        .stackapps()
        .args(["describe", "my_app", "--config"])
        .args([&missing])
        .fails()
        .stderr_has("failed to read config");
}

#[test]
fn unknown_config_key_is_rejected() {
    let project = Project::empty();
    let config = project.config("stak = \"acme\"\n");

    project
        .stackapps()
        .args(["describe", "my_app", "--config"])
        .args([&config])
        .fails()
        .stderr_has("invalid config");
}

#[test]
fn config_file_supplies_credentials() {
    let project = Project::empty();
    let config = project.config("token = \"t0ken\"\n");

    // Stack is the only thing missing once the token comes from the file
    project
        .stackapps()
        .args(["describe", "my_app", "--config"])
        .args([&config])
        .fails()
        .stderr_has("no stack configured");
}

#[test]
fn invalid_timing_is_rejected() {
    let project = Project::empty();
    let config = project.config("[timing]\nwait_timeout = \"soon\"\n");

    project
        .stackapps()
        .args(["describe", "my_app", "--config"])
        .args([&config])
        .fails()
        .stderr_has("invalid config");
}
