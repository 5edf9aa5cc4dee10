//! Tracing subscriber setup for WebScout
//!
//! Logs always go to stderr: in stdio server mode, stdout carries the
//! protocol stream and must stay clean.

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// The `RUST_LOG` environment variable takes precedence when set; otherwise
/// the level defaults to `debug` or `info` depending on the `debug` flag.
/// Calling this more than once is a no-op.
pub fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rmcp=warn,{default_level}")));

    let _ = registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
