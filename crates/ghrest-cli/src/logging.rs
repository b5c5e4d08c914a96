//! Tracing subscriber for the CLI.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a compact stderr logger.
///
/// `RUST_LOG` wins when set; otherwise ghrest crates log at `info`, `debug`
/// with `--verbose` and `warn` with `--quiet`.
pub fn init(verbose: bool, quiet: bool) {
    let default = if verbose {
        "ghrest=debug"
    } else if quiet {
        "ghrest=warn"
    } else {
        "ghrest=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
