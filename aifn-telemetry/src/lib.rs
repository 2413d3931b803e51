//! Observability utilities for function registries.
//!
//! The library crates only emit `tracing` events; binaries and tests decide
//! where those events go by installing a subscriber through this crate.

#![warn(missing_docs, clippy::pedantic)]

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Directive used by [`init_test_tracing`] when `RUST_LOG` is unset. Pass it
/// to [`init_tracing`] for the same default in binaries.
pub const DEFAULT_DIRECTIVE: &str = "info,aifn_registry=debug,aifn_engine=debug";

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` is used, for
/// example `"aifn_engine=debug,info"`.
///
/// # Errors
///
/// Returns an error when the directive does not parse or a global subscriber
/// is already installed.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .with_context(|| format!("invalid tracing directive `{default_directive}`"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::debug!(directive = default_directive, "tracing initialised");
    Ok(())
}

/// Installs a subscriber that writes through the test harness capture.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
