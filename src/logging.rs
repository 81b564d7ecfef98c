//! Tracing setup for hosts embedding the simulator
//!
//! The library only emits events under the `bacflow` target. A host that
//! has no subscriber of its own can install one here once at startup;
//! `RUST_LOG` overrides the level given in code.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::BacError;

/// Install a compact subscriber showing `bacflow` events at `info` and above
pub fn init() -> Result<(), BacError> {
    init_with_level("info")
}

/// Install a compact subscriber showing `bacflow` events at `level` and above
///
/// # Errors
///
/// [BacError::InvalidParameter] if `level` is not a tracing level, and
/// [BacError::Logging] if a global subscriber is already installed.
pub fn init_with_level(level: &str) -> Result<(), BacError> {
    tracing_subscriber::registry()
        .with(filter(level)?)
        .with(fmt::layer().compact().with_target(false))
        .try_init()
        .map_err(|e| BacError::Logging(e.to_string()))
}

fn filter(level: &str) -> Result<EnvFilter, BacError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let level: tracing::Level = level
        .trim()
        .parse()
        .map_err(|_| BacError::invalid_parameter("log_level", level))?;
    Ok(EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)))
}

/// Route events to the test harness output
#[cfg(test)]
pub(crate) fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("bacflow=trace"))
        .try_init();
}
