//! Tracing setup for host binaries.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is the host application's call. This helper wires up the stdout
//! subscriber the way the platform's tools do.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a compact stdout subscriber.
///
/// Default level is INFO with this crate at DEBUG; override via `RUST_LOG`.
/// Safe to call once per process; later calls are ignored.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kbqa_client=debug"));

    let stdout_layer = fmt::layer().with_target(true).compact();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();
}
