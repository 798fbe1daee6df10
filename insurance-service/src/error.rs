use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InsuranceError {
    #[error("Invalid benefits field `{field}`: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Deductible accumulators disagree: met {met} + remaining {remaining} != total {total}")]
    DeductibleMismatch {
        total: Decimal,
        met: Decimal,
        remaining: Decimal,
    },

    #[error("Deductible flag disagrees: is_deductible_met={flag}, remaining {remaining}")]
    DeductibleFlagMismatch { flag: bool, remaining: Decimal },
}

impl InsuranceError {
    /// Name of the benefits field the error points at
    pub fn field(&self) -> &'static str {
        match self {
            InsuranceError::InvalidField { field, .. } => field,
            InsuranceError::DeductibleMismatch { .. } => "deductible_total",
            InsuranceError::DeductibleFlagMismatch { .. } => "is_deductible_met",
        }
    }
}

pub type InsuranceResult<T> = Result<T, InsuranceError>;
