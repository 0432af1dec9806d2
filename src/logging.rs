//! Logging Module
//!
//! Structured logging with file output for diagnostics.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;

/// Initialize logging with file output, plus console output outside production
pub fn init(config: &Config) {
    let log_dir = config.data_root().join("logs");

    let _ = std::fs::create_dir_all(&log_dir);

    // Daily rotation
    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "skillbridge.log");

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_appender);

    let console_layer = if config.is_production() {
        None
    } else {
        Some(fmt::layer().with_target(true).with_writer(std::io::stderr).pretty())
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.is_production() {
            EnvFilter::new("info,hyper=warn,reqwest=warn")
        } else {
            EnvFilter::new("debug,hyper=warn,reqwest=warn")
        }
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer);

    let _ = tracing::subscriber::set_global_default(subscriber);
}
