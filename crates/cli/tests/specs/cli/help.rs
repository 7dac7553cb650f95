// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Help and completion specs

use crate::prelude::*;

#[test]
fn help_lists_app_commands() {
    Project::empty()
        .stackapps()
        .args(["--help"])
        .passes()
        .stdout_has("install")
        .stdout_has("describe")
        .stdout_has("update")
        .stdout_has("uninstall")
        .stdout_has("validate");
}

#[test]
fn install_help_lists_app_sources() {
    Project::empty()
        .stackapps()
        .args(["install", "--help"])
        .passes()
        .stdout_has("splunkbase")
        .stdout_has("private");
}

#[test]
fn private_install_help_shows_pre_vetted_flag() {
    Project::empty()
        .stackapps()
        .args(["install", "private", "--help"])
        .passes()
        .stdout_has("--pre-vetted")
        .stdout_has("--legal-ack");
}

#[test]
fn version_is_printed() {
    Project::empty()
        .stackapps()
        .args(["--version"])
        .passes()
        .stdout_has("stackapps");
}

#[test]
fn completions_need_no_config() {
    Project::empty()
        .stackapps()
        .args(["completions", "bash"])
        .passes()
        .stdout_has("stackapps");
}
