use thiserror::Error;

use crate::codes;

/// Platform error that every service error converts into at the API edge
#[derive(Error, Debug)]
pub enum DermCareError {
    /// Input rejected before any computation
    #[error("Validation error: {message}")]
    Validation {
        code: &'static str,
        message: String,
        field: Option<String>,
    },

    /// Well-formed input that violates a domain rule
    #[error("Business rule violation: {message}")]
    BusinessRule { code: &'static str, message: String },

    /// Settings could not be loaded or are invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DermCareError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn business_rule(code: &'static str, message: impl Into<String>) -> Self {
        Self::BusinessRule {
            code,
            message: message.into(),
        }
    }

    /// Attach the offending field name to a validation error; no-op otherwise
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        if let Self::Validation { field, .. } = &mut self {
            *field = Some(name.into());
        }
        self
    }

    /// Stable error code (see [`crate::codes`])
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { code, .. } | Self::BusinessRule { code, .. } => code,
            Self::Config(_) => codes::configuration::INVALID_CONFIGURATION,
            Self::Internal(_) | Self::Other(_) => codes::system::INTERNAL,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::BusinessRule { .. } => "business_rule_violation",
            Self::Config(_) => "configuration_error",
            Self::Internal(_) | Self::Other(_) => "internal_error",
        }
    }

    /// HTTP status the API layer should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::BusinessRule { .. } => 422,
            Self::Config(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for DermCare operations
pub type Result<T> = std::result::Result<T, DermCareError>;
