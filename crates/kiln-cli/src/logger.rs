//! Logging setup for the kiln CLI.
//!
//! Structured logging via the `tracing` ecosystem. Call once at startup.
//! Level resolution order: `--verbose` (debug), `--quiet` (error), the
//! `RUST_LOG` variable, then the info default.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber. Later calls are ignored.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("kiln_config=debug,kiln_cli=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("kiln_config=info,kiln_cli=info"))
    };

    let layer = fmt::layer()
        .with_target(verbose)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr);

    // try_init: a second init (e.g. in tests) is not an error worth dying on.
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
