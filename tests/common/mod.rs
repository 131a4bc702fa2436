//! Common test utilities and logging infrastructure
//!
//! Tests log through `tracing`; the library's `log` records are bridged
//! into the same subscriber, so fallback paths show up in test output.
//!
//! # Environment Variables
//!
//! - `RUST_LOG=debug` - Enable debug logging in tests
//! - `RUST_LOG=termwriter::writer=trace` - Module-specific tracing
//! - `TEST_LOG_JSON=1` - Output JSON format for CI parsing
//!
//! Note: Not all test utilities are used in every test module.

#![allow(dead_code)]

pub mod assertions;
pub mod capture;
pub mod env;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Initialize test logging infrastructure.
///
/// Idempotent; safe to call at the start of every test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let use_json = std::env::var("TEST_LOG_JSON").is_ok();

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("termwriter=debug,test=info"));

        if use_json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_test_writer())
                .try_init()
                .ok();
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_test_writer()
                        .with_ansi(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_target(true)
                        .compact(),
                )
                .try_init()
                .ok();
        }
    });
}

/// A test span guard that logs entry and exit.
pub fn test_phase(name: &str) -> tracing::span::EnteredSpan {
    let span = tracing::info_span!("test_phase", phase = name);
    tracing::info!(phase = name, "entering test phase");
    span.entered()
}

/// Log test context information.
pub fn log_test_context(test_name: &str, description: &str) {
    tracing::info!(
        test_name = test_name,
        description = description,
        "test context"
    );
}
