//! Diagnostic logging setup

use tracing_subscriber::{fmt, EnvFilter};

/// Install the tracing subscriber. Diagnostics go to stderr so they never mix
/// with report output on stdout.
///
/// Reads `RUST_LOG` (or `REVCHECK_LOG`); falls back to `default_level`, or
/// `debug` for this crate when `verbose` is set.
pub fn init_tracing(default_level: &str, verbose: bool) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("REVCHECK_LOG"))
        .unwrap_or_else(|_| {
            if verbose {
                EnvFilter::new(format!("{},revcheck=debug", default_level))
            } else {
                EnvFilter::new(default_level)
            }
        });

    // A second init (e.g. in tests) is harmless
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}
