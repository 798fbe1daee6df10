use error_common::ErrorReporter;
use logger_redacted::PiiRedactor;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::calculator::{with_overrides, ChargeCalculator};
use crate::error::BillingResult;
use crate::models::{ChargeSummary, CheckoutPayer, CheckoutRequest, Payer};
use crate::settings::BillingSettings;

/// Checkout billing service
#[derive(Debug, Clone)]
pub struct BillingService {
    calculator: Arc<ChargeCalculator>,
    redactor: PiiRedactor,
    default_discount_percent: Decimal,
}

impl BillingService {
    /// Create a billing service around a configured calculator
    pub fn new(
        calculator: ChargeCalculator,
        redactor: PiiRedactor,
        default_discount_percent: Decimal,
    ) -> Self {
        Self {
            calculator: Arc::new(calculator),
            redactor,
            default_discount_percent,
        }
    }

    /// # Errors
    ///
    /// Fails if the configured fee schedule or category table is invalid.
    pub fn from_settings(settings: &BillingSettings) -> BillingResult<Self> {
        Ok(Self::new(
            settings.calculator()?,
            PiiRedactor::from_logger_config(&settings.logging),
            settings.default_self_pay_discount_percent,
        ))
    }

    pub fn calculator(&self) -> &ChargeCalculator {
        &self.calculator
    }

    /// Error reporter sharing this service's redaction settings
    pub fn error_reporter(&self) -> ErrorReporter {
        ErrorReporter::with_redactor(self.redactor.clone())
    }

    /// Price a finished encounter for the front desk
    ///
    /// # Errors
    ///
    /// Any [`crate::BillingError`] from validation or fee resolution; nothing
    /// is computed for a request that fails.
    #[instrument(
        skip(self, request),
        fields(encounter_id = request.encounter_id.as_deref(), lines = request.codes.len())
    )]
    pub async fn checkout_summary(
        &self,
        request: &CheckoutRequest,
    ) -> BillingResult<ChargeSummary> {
        let calculator = with_overrides(&self.calculator, &request.practice_rates)?;
        let payer = self.resolve_payer(&request.payer);

        let summary = calculator.calculate(&request.codes, &payer)?;

        let payer_type = match payer {
            Payer::Insured(_) => "insured",
            Payer::SelfPay { .. } => "self_pay",
        };
        info!(
            payer_type,
            rate_overrides = request.practice_rates.len(),
            total_patient_responsibility = %summary.total_patient_responsibility(),
            "Checkout summary prepared"
        );
        Ok(summary)
    }

    /// Self-pay discounts apply only when toggled; a toggled request without
    /// a percent gets the practice default.
    fn resolve_payer(&self, payer: &CheckoutPayer) -> Payer {
        match payer {
            CheckoutPayer::Insured { benefits } => {
                debug!(
                    carrier = %benefits.carrier,
                    member_id = %benefits.redacted_member_id(&self.redactor),
                    "Using insurance benefits snapshot"
                );
                Payer::Insured(benefits.clone())
            }
            &CheckoutPayer::SelfPay {
                apply_discount,
                discount_percent,
            } => {
                if !apply_discount && discount_percent.is_some() {
                    debug!("Discount percent supplied without apply_discount; ignoring");
                }
                Payer::SelfPay {
                    discount_percent: apply_discount
                        .then(|| discount_percent.unwrap_or(self.default_discount_percent)),
                }
            }
        }
    }
}

impl Default for BillingService {
    fn default() -> Self {
        Self::new(ChargeCalculator::default(), PiiRedactor::default(), Decimal::from(15))
    }
}
