//! # Structured Logging
//!
//! Environment-aware `tracing` setup for applications embedding the client.
//! The library itself only emits events; installing a subscriber is left to
//! the caller, and [`init_logging`] is a convenience for doing so.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Output format for the console layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Initialize console logging once per process.
///
/// The filter comes from `DBT_CLOUD_LOG`, then `RUST_LOG`, then a level
/// derived from `DBT_CLOUD_ENV`. `DBT_CLOUD_LOG_FORMAT=json` switches to
/// JSON lines. An already-installed global subscriber is left in place.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = get_log_filter(&environment);
        let format = get_log_format();

        let console_layer = match format {
            LogFormat::Json => fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(EnvFilter::new(filter.clone()))
                .boxed(),
            LogFormat::Pretty => fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(EnvFilter::new(filter.clone()))
                .boxed(),
        };

        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - keeping it");
        }

        tracing::debug!(
            environment = %environment,
            filter = %filter,
            format = ?format,
            "Initialized dbt Cloud client logging"
        );
    });
}

fn get_environment() -> String {
    std::env::var("DBT_CLOUD_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

fn get_log_filter(environment: &str) -> String {
    if let Ok(filter) = std::env::var("DBT_CLOUD_LOG").or_else(|_| std::env::var("RUST_LOG")) {
        return filter;
    }
    default_level(environment).to_string()
}

fn default_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

fn get_log_format() -> LogFormat {
    match std::env::var("DBT_CLOUD_LOG_FORMAT").as_deref() {
        Ok("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}
