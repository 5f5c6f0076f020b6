use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

fn verbosity_directive(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Installs the global subscriber. Output goes to stderr so stdout stays
/// usable for `--print-config` and `check`.
///
/// `-v` flags win over `RUST_LOG`, which wins over `logging.level`.
///
/// # Errors
/// Fails on an invalid filter directive or when a subscriber is already set.
pub fn init(config: &LoggingConfig, verbose: u8) -> Result<()> {
    let filter = match verbosity_directive(verbose) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.level))
            .with_context(|| format!("logging.level: invalid filter '{}'", config.level))?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("failed to install the tracing subscriber")
}
