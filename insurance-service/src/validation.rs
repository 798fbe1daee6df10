use rust_decimal::Decimal;

use crate::error::{InsuranceError, InsuranceResult};
use crate::models::InsuranceBenefits;

const MAX_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Largest accepted money amount, $10,000,000.00.
///
/// Keeps every sum and product in checkout far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 2);

/// Check a benefits snapshot before any cost-share is computed from it.
///
/// # Errors
///
/// Rejects negative amounts or amounts above [`MAX_AMOUNT`], a coinsurance
/// percent outside 0-100, deductible accumulators that do not add up, and a
/// met flag that disagrees with the remaining amount.
pub fn validate_benefits(benefits: &InsuranceBenefits) -> InsuranceResult<()> {
    let amounts = [
        ("office_visit_copay", benefits.office_visit_copay),
        ("specialist_copay", benefits.specialist_copay),
        ("procedure_copay", benefits.procedure_copay.unwrap_or(Decimal::ZERO)),
        ("deductible_total", benefits.deductible_total),
        ("deductible_met", benefits.deductible_met),
        ("deductible_remaining", benefits.deductible_remaining),
    ];
    for (field, amount) in amounts {
        if amount < Decimal::ZERO {
            return Err(InsuranceError::InvalidField {
                field,
                message: format!("must not be negative, got {amount}"),
            });
        }
        if amount > MAX_AMOUNT {
            return Err(InsuranceError::InvalidField {
                field,
                message: format!("must not exceed {MAX_AMOUNT}, got {amount}"),
            });
        }
    }

    if benefits.coinsurance_percent < Decimal::ZERO || benefits.coinsurance_percent > MAX_PERCENT {
        return Err(InsuranceError::InvalidField {
            field: "coinsurance_percent",
            message: format!("must be between 0 and 100, got {}", benefits.coinsurance_percent),
        });
    }

    if benefits.deductible_met + benefits.deductible_remaining != benefits.deductible_total {
        return Err(InsuranceError::DeductibleMismatch {
            total: benefits.deductible_total,
            met: benefits.deductible_met,
            remaining: benefits.deductible_remaining,
        });
    }

    if benefits.is_deductible_met != benefits.deductible_remaining.is_zero() {
        return Err(InsuranceError::DeductibleFlagMismatch {
            flag: benefits.is_deductible_met,
            remaining: benefits.deductible_remaining,
        });
    }

    tracing::trace!(
        carrier = %benefits.carrier,
        plan = %benefits.plan,
        "Benefits snapshot validated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid() -> InsuranceBenefits {
        InsuranceBenefits::new("Cigna", "Open Access Plus", "U0001234")
            .with_copays(dec!(30), dec!(50), Some(dec!(60)))
            .with_deductible(dec!(2000), dec!(500))
            .with_coinsurance(dec!(20))
    }

    #[test]
    fn test_valid_snapshot_passes() {
        assert!(validate_benefits(&valid()).is_ok());
    }

    #[test]
    fn test_negative_copay_rejected() {
        let mut benefits = valid();
        benefits.specialist_copay = dec!(-1);
        let err = validate_benefits(&benefits).unwrap_err();
        assert_eq!(err.field(), "specialist_copay");
    }

    #[test]
    fn test_negative_procedure_copay_rejected() {
        let benefits = valid().with_copays(dec!(30), dec!(50), Some(dec!(-5)));
        let err = validate_benefits(&benefits).unwrap_err();
        assert_eq!(err.field(), "procedure_copay");
    }

    #[test]
    fn test_amount_above_maximum_rejected() {
        let mut benefits = valid();
        benefits.deductible_met = dec!(50000000000000000000000000000);
        benefits.deductible_remaining = dec!(50000000000000000000000000000);
        let err = validate_benefits(&benefits).unwrap_err();
        assert_eq!(err.field(), "deductible_met");

        let benefits = valid().with_copays(MAX_AMOUNT, dec!(50), None);
        assert!(validate_benefits(&benefits).is_ok());
        let benefits = valid().with_copays(MAX_AMOUNT + dec!(0.01), dec!(50), None);
        assert_eq!(validate_benefits(&benefits).unwrap_err().field(), "office_visit_copay");
    }

    #[test]
    fn test_coinsurance_out_of_range() {
        let err = validate_benefits(&valid().with_coinsurance(dec!(100.01))).unwrap_err();
        assert_eq!(err.field(), "coinsurance_percent");

        let err = validate_benefits(&valid().with_coinsurance(dec!(-0.5))).unwrap_err();
        assert_eq!(err.field(), "coinsurance_percent");

        assert!(validate_benefits(&valid().with_coinsurance(dec!(100))).is_ok());
        assert!(validate_benefits(&valid().with_coinsurance(dec!(0))).is_ok());
    }

    #[test]
    fn test_accumulator_mismatch() {
        let mut benefits = valid();
        benefits.deductible_remaining = dec!(1400);
        assert_eq!(
            validate_benefits(&benefits),
            Err(InsuranceError::DeductibleMismatch {
                total: dec!(2000),
                met: dec!(500),
                remaining: dec!(1400),
            })
        );
    }

    #[test]
    fn test_met_flag_mismatch() {
        let mut benefits = valid();
        benefits.is_deductible_met = true;
        assert!(matches!(
            validate_benefits(&benefits),
            Err(InsuranceError::DeductibleFlagMismatch { flag: true, .. })
        ));

        let mut benefits = valid().with_deductible(dec!(2000), dec!(2000));
        benefits.is_deductible_met = false;
        assert!(matches!(
            validate_benefits(&benefits),
            Err(InsuranceError::DeductibleFlagMismatch { flag: false, .. })
        ));
    }
}
