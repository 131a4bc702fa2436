//! Environment helpers for tests that read the process environment.
//!
//! Callers must be marked `#[serial]`.

#![allow(dead_code)]

/// Run `f` with each `(key, value)` applied; `None` removes the variable.
/// Previous values are restored afterwards.
pub fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let originals: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| ((*key).to_string(), std::env::var(key).ok()))
        .collect();

    for (key, value) in vars {
        // SAFETY: Test-only code, serialized with #[serial]
        match value {
            Some(value) => unsafe { std::env::set_var(key, value) },
            None => unsafe { std::env::remove_var(key) },
        }
    }

    let result = f();

    for (key, value) in originals {
        // SAFETY: Test-only code, serialized with #[serial]
        match value {
            Some(value) => unsafe { std::env::set_var(&key, value) },
            None => unsafe { std::env::remove_var(&key) },
        }
    }

    result
}
