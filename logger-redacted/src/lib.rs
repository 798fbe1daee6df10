//! HIPAA-compliant logging for DermCare services
//!
//! Two concerns live here: installing the global `tracing` subscriber, and
//! redacting PII/PHI before it reaches a log line or an error body.
//!
//! # Detected Data Types
//!
//! - **Member IDs**: `W123456789` → `******6789` (or a correlation hash)
//! - **Email Addresses**: `user@example.com` → `u***@e***`
//! - **Phone Numbers**: `(555) 123-4567` → `(***) ***-****`
//! - **SSN**: `123-45-6789` → `***-**-****`
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init, LoggerConfig, PiiRedactor};
//!
//! init(&LoggerConfig::default()).unwrap();
//!
//! let redactor = PiiRedactor::from_logger_config(&LoggerConfig::default());
//! tracing::info!(member_id = %redactor.redact_identifier("W123456789"), "benefits loaded");
//! ```

pub mod redactor;
pub mod config;

pub use redactor::*;
pub use config::*;

use thiserror::Error;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.log_level` when set.
///
/// # Errors
///
/// Returns an error if the filter directive cannot be parsed or a global
/// subscriber has already been installed.
pub fn init(config: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init()?,
        LogFormat::Bunyan => registry
            .with(JsonStorageLayer)
            .with(BunyanFormattingLayer::new(
                config.service_name.clone(),
                std::io::stdout,
            ))
            .try_init()?,
    }

    tracing::debug!(
        format = ?config.format,
        redaction_enabled = config.redaction_enabled,
        "Logging initialized"
    );
    Ok(())
}
