// Error reporting utilities
// Turns a DermCareError into a client-safe report and logs it with correlation ids.

use chrono::{DateTime, Utc};
use logger_redacted::PiiRedactor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::ErrorContext;
use crate::types::DermCareError;

/// Client-facing error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Unique error ID for tracking
    pub error_id: Uuid,
    pub error_type: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Error reporter; error text is passed through a [`PiiRedactor`] before it
/// is logged or returned
#[derive(Debug, Clone, Default)]
pub struct ErrorReporter {
    redactor: PiiRedactor,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_redactor(redactor: PiiRedactor) -> Self {
        Self { redactor }
    }

    /// Log the error and build the report returned to the caller.
    ///
    /// Internal errors are reported with a generic message so that
    /// implementation details stay in the logs.
    pub fn report(&self, error: &DermCareError, context: &ErrorContext) -> ErrorReport {
        let error_id = Uuid::new_v4();
        // Messages can echo request values, e.g. serde's "invalid type" text
        let detail = self.redactor.redact(&error.to_string());

        if error.http_status() >= 500 {
            tracing::error!(
                error_id = %error_id,
                error_type = error.error_type(),
                error_code = error.code(),
                request_id = context.request_id.as_deref(),
                encounter_id = context.encounter_id.as_deref(),
                error = %detail,
                "Error reported"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_type = error.error_type(),
                error_code = error.code(),
                request_id = context.request_id.as_deref(),
                encounter_id = context.encounter_id.as_deref(),
                error = %detail,
                "Request rejected"
            );
        }

        let message = match error {
            DermCareError::Internal(_) | DermCareError::Other(_) => {
                "An internal error occurred".to_string()
            }
            _ => detail,
        };

        ErrorReport {
            error_id,
            error_type: error.error_type().to_string(),
            code: error.code().to_string(),
            message,
            field: error.field().map(str::to_string),
            request_id: context.request_id.clone(),
            timestamp: Utc::now(),
        }
    }
}
