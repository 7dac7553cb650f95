// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    ok = { 200, "OK" },
    accepted = { 202, "Accepted" },
    not_found = { 404, "Not Found" },
    conflict = { 409, "Conflict" },
    failed_dependency = { 424, "Failed Dependency" },
    too_many_requests = { 429, "Too Many Requests" },
    service_unavailable = { 503, "Service Unavailable" },
)]
fn http_status_renders_reason_text(code: u16, text: &str) {
    assert_eq!(Status::from_code(code).to_string(), text);
}

#[test]
fn out_of_range_code_is_unrecognized() {
    assert_eq!(Status::from_code(42), Status::Unrecognized("42".to_string()));
    assert_eq!(Status::from_code(42).code(), None);
}

#[test]
fn code_without_reason_renders_digits() {
    assert_eq!(Status::from_code(599).to_string(), "599");
}

#[parameterized(
    success = { "success", Status::Success },
    processing_mixed_case = { " Processing ", Status::Processing },
    error = { "ERROR", Status::Error },
    unknown = { "queued", Status::Unrecognized("queued".to_string()) },
)]
fn domain_status_parsing(text: &str, expected: Status) {
    assert_eq!(Status::parse_domain(text), expected);
}

#[test]
fn status_set_ignores_duplicates() {
    let set = StatusSet::new([Status::OK, Status::OK, Status::ACCEPTED]);
    assert_eq!(set.iter().count(), 2);
    assert_eq!(set.to_string(), "[OK, Accepted]");
}

#[test]
fn named_sets_are_disjoint() {
    for sets in [
        StatusSets::write(),
        StatusSets::verify_created(),
        StatusSets::verify_deleted(),
        StatusSets::read(),
        StatusSets::validation(),
    ] {
        assert!(sets.is_disjoint(), "overlapping sets: {:?}", sets);
    }
}

#[test]
fn verify_deleted_partitions_existence() {
    let sets = StatusSets::verify_deleted();
    assert_eq!(sets.partition(&Status::OK), Partition::Pending);
    assert_eq!(sets.partition(&Status::NOT_FOUND), Partition::Target);
    assert_eq!(sets.partition(&Status::BAD_REQUEST), Partition::Failure);
}

#[test]
fn validation_partitions_domain_statuses() {
    let sets = StatusSets::validation();
    assert_eq!(sets.partition(&Status::Processing), Partition::Pending);
    assert_eq!(sets.partition(&Status::Success), Partition::Target);
    assert_eq!(sets.partition(&Status::Error), Partition::Failure);
    assert_eq!(
        sets.partition(&Status::Unrecognized("queued".into())),
        Partition::Failure
    );
}
