//! Tracing subscriber setup.

use crate::{Result, RunnerError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter directives for the given verbosity.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,floodwatch={level},floodwatch_predict={level},floodwatch_runner={level}")
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the defaults. Logs go to stderr so
/// rendered output on stdout stays clean.
pub fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| RunnerError::Logging(e.to_string()))
}
