use config_engine::ConfigError;
use error_common::{codes, DermCareError};
use insurance_service::InsuranceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Invalid input `{field}`: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Unknown procedure code: {0}")]
    UnknownCode(String),

    #[error("Invalid insurance benefits: {0}")]
    InvalidBenefits(#[from] InsuranceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl BillingError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type BillingResult<T> = Result<T, BillingError>;

impl From<BillingError> for DermCareError {
    fn from(err: BillingError) -> Self {
        let message = err.to_string();
        match err {
            BillingError::InvalidInput { field, .. } => {
                DermCareError::validation(codes::validation::INVALID_INPUT, message)
                    .with_field(field)
            }
            BillingError::UnknownCode(_) => {
                DermCareError::business_rule(codes::billing::UNKNOWN_PROCEDURE_CODE, message)
            }
            BillingError::InvalidBenefits(inner) => {
                DermCareError::validation(codes::billing::INCONSISTENT_BENEFITS, message)
                    .with_field(format!("benefits.{}", inner.field()))
            }
            BillingError::Config(_) => DermCareError::Config(message),
        }
    }
}
