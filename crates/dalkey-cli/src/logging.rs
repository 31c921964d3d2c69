//! Logging setup for the dalkey binary.
//!
//! The resolver library only emits tracing events; the subscriber lives
//! here. A resolve invocation is a single short-lived command, so there
//! is no per-module filtering: `-v` raises the whole process to DEBUG,
//! `-vv` to TRACE, and an explicit `RUST_LOG` replaces the flag-derived
//! filter entirely.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// With `json`, log lines go to stderr as JSON so they can share a pipe
/// with the `--json` resolution record on stdout.
///
/// # Panics
/// Panics if a global subscriber is already installed.
pub fn init(verbosity: u8, json: bool) {
    let fallback = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}
