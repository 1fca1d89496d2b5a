use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::LogConfig;

/// Route `tracing` output to the configured log file.
///
/// The terminal is in raw mode while the game runs, so nothing may be
/// printed to it. `RUST_LOG` overrides the configured level.
pub fn setup_logging(cfg: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .with_context(|| format!("invalid log level {:?}", cfg.level))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.file)
        .with_context(|| format!("could not open log file {}", cfg.file.display()))?;

    let subscriber = FmtSubscriber::builder()
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")
}
