//! Classification of OS error codes observed by task implementations.
//!
//! These are pure predicates. The scheduler does not enforce them; tasks use them
//! to decide between stalling and retrying, retrying at the protocol layer, or
//! surfacing a hard failure.

use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What a task should do about an OS error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Stall and try the same operation again.
    Retry,
    /// Transient network condition; reconnect or retry at the protocol layer.
    TransientNetwork,
    /// Permanent failure for the task to report.
    Fatal,
}

fn is_immediate_retry(err: i32) -> bool {
    err == libc::EAGAIN || err == libc::EWOULDBLOCK || err == libc::EINTR
}

fn is_resource_exhaustion(err: i32) -> bool {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    if err == libc::ENOSR {
        return true;
    }
    err == libc::ENFILE || err == libc::EMFILE || err == libc::ENOBUFS
}

fn is_disk_full(err: i32) -> bool {
    err == libc::ENOSPC || err == libc::EDQUOT
}

/// The operation should be retried as a stall rather than failed.
///
/// Disk-full conditions are retryable unless `disk_full_fatal` is set.
#[must_use]
pub fn is_non_fatal(err: i32, disk_full_fatal: bool) -> bool {
    is_immediate_retry(err)
        || is_resource_exhaustion(err)
        || (is_disk_full(err) && !disk_full_fatal)
}

/// The error is a transient network condition.
#[must_use]
pub fn is_temporary_network_error(err: i32) -> bool {
    matches!(
        err,
        libc::EPIPE
            | libc::EIO
            | libc::ETIMEDOUT
            | libc::ECONNRESET
            | libc::ECONNREFUSED
            | libc::ECONNABORTED
            | libc::ENETUNREACH
            | libc::ENETDOWN
            | libc::ENETRESET
            | libc::EHOSTUNREACH
            | libc::EHOSTDOWN
            | libc::EADDRNOTAVAIL
    )
}

/// How long to wait before retrying a non-fatal error.
///
/// `None` for errors that are not retried at this layer.
#[must_use]
pub fn retry_delay(err: i32, disk_full_fatal: bool, resource_backoff: Duration) -> Option<Duration> {
    if is_immediate_retry(err) {
        Some(Duration::ZERO)
    } else if is_resource_exhaustion(err) || (is_disk_full(err) && !disk_full_fatal) {
        Some(resource_backoff)
    } else {
        None
    }
}

/// Combine both predicates. Errors without an OS code are fatal.
#[must_use]
pub fn classify(err: &io::Error, disk_full_fatal: bool) -> ErrorClass {
    match err.raw_os_error() {
        Some(code) if is_non_fatal(code, disk_full_fatal) => ErrorClass::Retry,
        Some(code) if is_temporary_network_error(code) => ErrorClass::TransientNetwork,
        _ => ErrorClass::Fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_would_block_is_non_fatal() {
        assert!(is_non_fatal(libc::EAGAIN, false));
        assert!(is_non_fatal(libc::EINTR, true));
        assert_eq!(
            retry_delay(libc::EAGAIN, false, Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_resource_exhaustion_backs_off() {
        let backoff = Duration::from_millis(1000);
        assert!(is_non_fatal(libc::EMFILE, false));
        assert_eq!(retry_delay(libc::ENFILE, false, backoff), Some(backoff));
    }

    #[test]
    fn test_disk_full_policy() {
        assert!(is_non_fatal(libc::ENOSPC, false));
        assert!(!is_non_fatal(libc::ENOSPC, true));
        assert!(!is_non_fatal(libc::EDQUOT, true));
        assert_eq!(retry_delay(libc::ENOSPC, true, Duration::from_secs(1)), None);
    }

    #[test]
    fn test_network_errors() {
        assert!(is_temporary_network_error(libc::ECONNRESET));
        assert!(is_temporary_network_error(libc::ETIMEDOUT));
        assert!(!is_temporary_network_error(libc::ENOENT));
        assert!(!is_non_fatal(libc::ECONNRESET, false));
    }

    #[test]
    fn test_classify() {
        let retry = io::Error::from_raw_os_error(libc::EWOULDBLOCK);
        let net = io::Error::from_raw_os_error(libc::ECONNREFUSED);
        let fatal = io::Error::from_raw_os_error(libc::EACCES);
        let synthetic = io::Error::other("no errno");
        assert_eq!(classify(&retry, false), ErrorClass::Retry);
        assert_eq!(classify(&net, false), ErrorClass::TransientNetwork);
        assert_eq!(classify(&fatal, false), ErrorClass::Fatal);
        assert_eq!(classify(&synthetic, false), ErrorClass::Fatal);
    }
}
