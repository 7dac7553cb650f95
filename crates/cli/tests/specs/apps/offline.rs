// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! App operations that fail before or without reaching a stack

use crate::prelude::*;

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn configured(project: &Project) -> Cli {
    project
        .stackapps()
        .env("STACKAPPS_TOKEN", "t0ken")
        .env("STACKAPPS_STACK", "acme")
        .env("STACKAPPS_SERVER", UNREACHABLE)
}

#[test]
fn private_install_without_pre_vetting_is_rejected() {
    let project = Project::empty();
    let package = project.file("app.tgz", "pkg");

    configured(&project)
        .args(["install", "private", "--name", "my_app", "--legal-ack", "Y", "--package"])
        .args([&package])
        .fails()
        .stderr_has("failed to create app my_app")
        .stderr_has("pre-vetted")
        .stderr_has("stackapps validate");
}

#[test]
fn missing_package_is_reported_without_a_request() {
    let project = Project::empty();

    configured(&project)
        .args([
            "install",
            "private",
            "--name",
            "my_app",
            "--legal-ack",
            "Y",
            "--pre-vetted",
            "--package",
            "missing.tgz",
        ])
        .fails()
        .stderr_has("failed to read app package");
}

#[test]
fn unreachable_server_fails_without_retrying() {
    let project = Project::empty();

    configured(&project)
        .args(["describe", "my_app"])
        .fails()
        .stderr_has("failed to read app my_app")
        .stdout_lacks("App:");
}

#[test]
fn empty_splunkbase_version_is_invalid() {
    let project = Project::empty();

    configured(&project)
        .args([
            "update",
            "splunkbase",
            "--name",
            "Splunk_TA_aws",
            "--splunkbase-id",
            "1876",
            "--version",
            "",
            "--license-url",
            "https://example.com/license",
        ])
        .fails()
        .stderr_has("version must not be empty");
}
