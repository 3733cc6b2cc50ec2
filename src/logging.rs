//! Logging initialization for the CLI binary.
//!
//! Structured logging via the `tracing` crate. The library itself only emits
//! events; installing a subscriber is left to the binary (or the embedding
//! application), so library consumers keep control of their own logging.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize a stderr subscriber.
///
/// The filter comes from `AIX_LOG` when set (same syntax as `RUST_LOG`),
/// otherwise `debug` with `--verbose` and `warn` without. `AIX_LOG_FORMAT=json`
/// switches to JSON output.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("AIX_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    let json = std::env::var("AIX_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
