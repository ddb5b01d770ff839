//! Tracing subscriber setup.
//!
//! Log lines go to stderr so that `--json` output on stdout stays parseable.
//! `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
//! with `--verbose`.

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One compact line per event
    Compact,
    /// One JSON object per event (tool integration)
    Json,
}

pub fn init_logging(verbose: bool, format: LogFormat) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let layer = match format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
