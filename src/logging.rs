//! Tracing subscriber setup for the CLI.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects debug-level events
/// from this crate (one per encode attempt).
pub fn init_cli_logger(verbose: bool) {
    let fallback = if verbose {
        "image_feed=debug,warn"
    } else {
        "image_feed=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .init();
}
