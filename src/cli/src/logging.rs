use anyhow::{Context, Result};
use hookfwd_common::constants::{LOG_FILE, WORKING_DIR};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, time::SystemTime},
    prelude::*,
    EnvFilter,
};

pub fn setup_logging(log_level: &str) -> Result<()> {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .with_context(|| format!("Invalid log filter: {}", log_level))?;

    std::fs::create_dir_all(WORKING_DIR)
        .with_context(|| format!("Failed to create {}", WORKING_DIR))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("hookfwd")
        .filename_suffix("log")
        .build(WORKING_DIR)
        .context("Failed to create log file appender")?;

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_timer(SystemTime)
        .with_writer(file_appender);

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    tracing::info!("Logging system initialized. Writing to {}", LOG_FILE);

    Ok(())
}
