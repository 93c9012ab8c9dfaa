//! Tests for step outcomes and error classification

use prometheus_stepwise::core::{is_non_fatal, is_temporary_network_error, ErrorClass};
use prometheus_stepwise::Outcome;

#[test]
fn test_outcome_combination() {
    let mut round = Outcome::STALL;
    round |= Outcome::STALL;
    assert!(round.is_stall());
    round |= Outcome::MOVED | Outcome::WANT_DIE;
    assert!(round.is_moved());
    assert!(round.wants_die());
    assert_eq!(format!("{round:?}"), "MOVED | WANT_DIE");
}

#[test]
fn test_outcome_serializes_as_bits() {
    let json = serde_json::to_string(&(Outcome::MOVED | Outcome::WANT_DIE)).unwrap();
    assert_eq!(json, "3");
}

#[test]
fn test_error_predicates() {
    assert!(is_non_fatal(libc::EWOULDBLOCK, false));
    assert!(is_non_fatal(libc::ENOSPC, false));
    assert!(!is_non_fatal(libc::ENOSPC, true));
    assert!(!is_non_fatal(libc::ECONNRESET, false));
    assert!(is_temporary_network_error(libc::ECONNRESET));
    assert!(!is_temporary_network_error(libc::EAGAIN));
}

#[test]
fn test_error_class_serde() {
    let json = serde_json::to_string(&ErrorClass::TransientNetwork).unwrap();
    assert_eq!(json, "\"transient_network\"");
}
