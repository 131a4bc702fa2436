//! Logged assertion helpers.
//!
//! These wrap standard assertions with tracing logs so failures in CI carry
//! the compared values.

#![allow(dead_code)]

use std::fmt::Debug;

/// Assert equality with detailed logging.
#[track_caller]
pub fn assert_eq_logged<T: PartialEq + Debug>(context: &str, actual: T, expected: T) {
    tracing::debug!(
        context = context,
        expected = ?expected,
        actual = ?actual,
        "asserting equality"
    );

    if actual != expected {
        tracing::error!(
            context = context,
            expected = ?expected,
            actual = ?actual,
            "assertion failed: values not equal"
        );
    }

    assert_eq!(
        actual, expected,
        "{context}: expected {expected:?}, got {actual:?}"
    );
}

/// Assert that a value is true with logging.
#[track_caller]
pub fn assert_true_logged(context: &str, value: bool) {
    tracing::debug!(context = context, value = value, "asserting true");

    if !value {
        tracing::error!(context = context, "assertion failed: expected true");
    }

    assert!(value, "{context}: expected true, got false");
}

/// Assert that output contains no ANSI escape sequences.
#[track_caller]
pub fn assert_no_ansi_logged(context: &str, output: &str) {
    tracing::debug!(context = context, output = ?output, "asserting no ANSI");
    assert!(
        !output.contains('\x1b'),
        "{context}: expected no ANSI escapes, got {output:?}"
    );
}
