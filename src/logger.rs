//! This module sets up the `tracing` subscriber. Events go to stderr, so that they never interleave
//! with the prompts on stdout.

use std::io;

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{fmt, EnvFilter};

/// This function installs the global subscriber. `RUST_LOG` takes precedence over the verbosity
/// flag when it is set.
pub(crate) fn init_logger(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

/// This function returns the filter used when `RUST_LOG` isn't set.
const fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "crossplay=debug"
    } else {
        "crossplay=warn"
    }
}
