// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the revq CLI.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging.
//! Log level can be controlled via the `RUST_LOG` environment variable.
//!
//! # Examples
//!
//! ```bash
//! # Default: warnings only
//! revq review 42 --repo owner/repo
//!
//! # Debug output for troubleshooting
//! RUST_LOG=revq=debug revq review 42 --repo owner/repo
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging subsystem.
///
/// Logs go to stderr so structured stdout output stays parseable. The
/// `RUST_LOG` environment variable overrides the default filter.
pub fn init_logging(verbose: bool) {
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let default_filter = if verbose {
        "revq=debug,octocrab=warn"
    } else {
        "revq=warn,octocrab=error"
    };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .expect("valid default filter directives");

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
