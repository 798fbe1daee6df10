//! Checkout charge calculation.
//!
//! The calculator is immutable once built: every call validates its inputs,
//! prices every line, and only then computes cost-share, so an invalid
//! request never yields a partial result.

use insurance_service::{validate_benefits, DeductibleStatus, InsuranceBenefits};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::classification::CategoryTable;
use crate::error::{BillingError, BillingResult};
use crate::fee_schedule::FeeScheduleConfig;
use crate::models::{
    CalculationResult, ChargeCategory, ChargeLineResult, ChargeSummary, CopayDetails, FeeSource,
    Payer, ProcedureCode, SelfPayLineResult, SelfPayResult,
};
use crate::money::{percent_of, round_currency, usd};

/// How the remaining deductible is shared between lines of one encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductiblePolicy {
    /// Every line is measured against the same starting snapshot
    #[default]
    PerLineSnapshot,
    /// A running remaining amount is drawn down line by line
    Cumulative,
}

/// What to do with a code found in neither fee table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCodePolicy {
    /// Fail the whole calculation
    #[default]
    Reject,
    /// Price the line at zero and flag it in the breakdown
    ZeroFee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationPolicy {
    pub deductible: DeductiblePolicy,
    pub unknown_code: UnknownCodePolicy,
}

/// A line after fee lookup and classification
#[derive(Debug)]
struct PricedLine<'a> {
    procedure: &'a ProcedureCode,
    code: &'a str,
    unit_fee: Decimal,
    total_fee: Decimal,
    source: FeeSource,
    category: ChargeCategory,
}

impl PricedLine<'_> {
    fn opening_breakdown(&self) -> Vec<String> {
        let mut steps = Vec::new();
        if self.source == FeeSource::Unlisted {
            steps.push(format!(
                "WARNING: {} not found in practice or default fee schedule; priced at $0.00",
                self.code
            ));
        }
        let modifiers = if self.procedure.modifiers.is_empty() {
            String::new()
        } else {
            format!(" [modifiers: {}]", self.procedure.modifiers.join(", "))
        };
        steps.push(format!(
            "Fee: {} x {} unit(s) = {}{}",
            usd(self.unit_fee),
            self.procedure.units,
            usd(self.total_fee),
            modifiers
        ));
        steps
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChargeCalculator {
    fees: FeeScheduleConfig,
    categories: CategoryTable,
    policy: CalculationPolicy,
}

impl ChargeCalculator {
    /// # Errors
    ///
    /// Fails if the fee schedule or category table is invalid.
    pub fn new(
        fees: FeeScheduleConfig,
        categories: CategoryTable,
        policy: CalculationPolicy,
    ) -> BillingResult<Self> {
        fees.validate()?;
        categories.validate()?;
        Ok(Self {
            fees,
            categories,
            policy,
        })
    }

    pub fn fee_schedule(&self) -> &FeeScheduleConfig {
        &self.fees
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn policy(&self) -> CalculationPolicy {
        self.policy
    }

    /// Calculator whose practice rates are overlaid with `overrides`
    ///
    /// # Errors
    ///
    /// Fails if an override is out of range or has a blank code.
    pub fn with_practice_rates(
        &self,
        overrides: &BTreeMap<String, Decimal>,
    ) -> BillingResult<Self> {
        Self::new(self.fees.merged_with(overrides), self.categories.clone(), self.policy)
    }

    /// # Errors
    ///
    /// See [`Self::calculate_insured`] and [`Self::calculate_self_pay`].
    pub fn calculate(
        &self,
        codes: &[ProcedureCode],
        payer: &Payer,
    ) -> BillingResult<ChargeSummary> {
        match payer {
            Payer::Insured(benefits) => self
                .calculate_insured(codes, benefits)
                .map(ChargeSummary::Insured),
            Payer::SelfPay { discount_percent } => self
                .calculate_self_pay(codes, *discount_percent)
                .map(ChargeSummary::SelfPay),
        }
    }

    /// Apply deductible, copay and coinsurance to each line in input order.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for malformed codes, `InvalidBenefits` for an
    /// inconsistent benefits snapshot, `UnknownCode` when an unpriced code
    /// is rejected by policy.
    pub fn calculate_insured(
        &self,
        codes: &[ProcedureCode],
        benefits: &InsuranceBenefits,
    ) -> BillingResult<CalculationResult> {
        validate_benefits(benefits)?;
        let lines = self.price_lines(codes)?;

        let snapshot_remaining = match benefits.deductible_status() {
            DeductibleStatus::Outstanding { remaining } => round_currency(remaining),
            DeductibleStatus::Met => Decimal::ZERO,
        };
        let mut running_remaining = snapshot_remaining;
        let mut copay_details: Option<CopayDetails> = None;
        let hsa_qualified = benefits.hsa_qualified();

        let mut charges = Vec::with_capacity(lines.len());
        for line in &lines {
            let mut breakdown = line.opening_breakdown();
            breakdown.push(format!("Category: {}", line.category.label()));

            let remaining = match self.policy.deductible {
                DeductiblePolicy::PerLineSnapshot => snapshot_remaining,
                DeductiblePolicy::Cumulative => running_remaining,
            };

            let outstanding = remaining > Decimal::ZERO;
            let (copay_applied, deductible_applied, coinsurance_amount) = if outstanding {
                let applied = line.total_fee.min(remaining);
                if self.policy.deductible == DeductiblePolicy::Cumulative {
                    running_remaining -= applied;
                }
                breakdown.push(format!("Deductible not met: {} remaining", usd(remaining)));
                breakdown.push(format!("Applied to deductible: {}", usd(applied)));
                (Decimal::ZERO, applied, Decimal::ZERO)
            } else {
                breakdown.push("Deductible met".to_string());

                let copay = match (copay_details, line.category.copay_type()) {
                    (None, Some(copay_type)) if line.total_fee > Decimal::ZERO => {
                        let amount =
                            round_currency(benefits.copay_for(copay_type)).min(line.total_fee);
                        copay_details = Some(CopayDetails { copay_type, amount });
                        breakdown.push(format!(
                            "Copay ({}): {}",
                            line.category.label(),
                            usd(amount)
                        ));
                        amount
                    }
                    (Some(details), Some(_)) => {
                        breakdown.push(format!(
                            "Encounter copay already applied ({})",
                            usd(details.amount)
                        ));
                        Decimal::ZERO
                    }
                    _ => Decimal::ZERO,
                };

                let coinsurance = if benefits.coinsurance_percent > Decimal::ZERO {
                    let base = line.total_fee - copay;
                    let amount = percent_of(base, benefits.coinsurance_percent);
                    breakdown.push(format!(
                        "Coinsurance {}% of {}: {}",
                        benefits.coinsurance_percent.normalize(),
                        usd(base),
                        usd(amount)
                    ));
                    amount
                } else {
                    breakdown.push("No coinsurance".to_string());
                    Decimal::ZERO
                };

                (copay, Decimal::ZERO, coinsurance)
            };

            let patient_responsibility = copay_applied + deductible_applied + coinsurance_amount;
            let is_hsa_eligible = hsa_qualified && line.category.is_hsa_taggable();
            if is_hsa_eligible {
                breakdown.push("HSA eligible".to_string());
            }
            breakdown.push(format!("Patient responsibility: {}", usd(patient_responsibility)));

            debug!(
                code = line.code,
                category = line.category.label(),
                total_fee = %line.total_fee,
                patient_responsibility = %patient_responsibility,
                "Insured line calculated"
            );

            charges.push(ChargeLineResult {
                code: line.code.to_string(),
                description: line.procedure.description.clone(),
                units: line.procedure.units,
                modifiers: line.procedure.modifiers.clone(),
                unit_fee: line.unit_fee,
                total_fee: line.total_fee,
                copay_applied,
                deductible_applied,
                coinsurance_amount,
                patient_responsibility,
                applied_to_deductible: deductible_applied > Decimal::ZERO,
                category: line.category,
                is_hsa_eligible,
                fee_source: line.source,
                breakdown,
            });
        }

        let result = CalculationResult {
            total_fees: charges.iter().map(|c| c.total_fee).sum(),
            total_patient_responsibility: charges
                .iter()
                .map(|c| c.patient_responsibility)
                .sum(),
            total_copay: charges.iter().map(|c| c.copay_applied).sum(),
            total_deductible: charges.iter().map(|c| c.deductible_applied).sum(),
            total_coinsurance: charges.iter().map(|c| c.coinsurance_amount).sum(),
            total_hsa_eligible: charges
                .iter()
                .filter(|c| c.is_hsa_eligible)
                .map(|c| c.total_fee)
                .sum(),
            copay_details,
            charges,
        };

        info!(
            lines = result.charges.len(),
            deductible_policy = ?self.policy.deductible,
            total_patient_responsibility = %result.total_patient_responsibility,
            "Insured charges calculated"
        );
        Ok(result)
    }

    /// Price each line and apply the optional self-pay discount.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for malformed codes or a discount outside 0-100,
    /// `UnknownCode` when an unpriced code is rejected by policy.
    pub fn calculate_self_pay(
        &self,
        codes: &[ProcedureCode],
        discount_percent: Option<Decimal>,
    ) -> BillingResult<SelfPayResult> {
        if let Some(percent) = discount_percent {
            validate_percent("discount_percent", percent)?;
        }
        let lines = self.price_lines(codes)?;

        let charges: Vec<SelfPayLineResult> = lines
            .iter()
            .map(|line| {
                let mut breakdown = line.opening_breakdown();
                let discount = match discount_percent {
                    Some(percent) => {
                        let amount = percent_of(line.total_fee, percent);
                        breakdown.push(format!(
                            "Self-pay discount {}%: -{}",
                            percent.normalize(),
                            usd(amount)
                        ));
                        amount
                    }
                    None => {
                        breakdown.push("No self-pay discount".to_string());
                        Decimal::ZERO
                    }
                };
                let patient_responsibility = line.total_fee - discount;
                breakdown.push(format!("Patient responsibility: {}", usd(patient_responsibility)));

                SelfPayLineResult {
                    code: line.code.to_string(),
                    description: line.procedure.description.clone(),
                    units: line.procedure.units,
                    modifiers: line.procedure.modifiers.clone(),
                    unit_fee: line.unit_fee,
                    total_fee: line.total_fee,
                    discount,
                    patient_responsibility,
                    fee_source: line.source,
                    breakdown,
                }
            })
            .collect();

        let result = SelfPayResult {
            discount_percent,
            total_fees: charges.iter().map(|c| c.total_fee).sum(),
            total_discount: charges.iter().map(|c| c.discount).sum(),
            total_patient_responsibility: charges.iter().map(|c| c.patient_responsibility).sum(),
            charges,
        };

        info!(
            lines = result.charges.len(),
            discounted = discount_percent.is_some(),
            total_patient_responsibility = %result.total_patient_responsibility,
            "Self-pay charges calculated"
        );
        Ok(result)
    }

    /// Validate, price and classify every line before any cost-share work
    fn price_lines<'a>(&self, codes: &'a [ProcedureCode]) -> BillingResult<Vec<PricedLine<'a>>> {
        let mut lines = Vec::with_capacity(codes.len());
        for (idx, procedure) in codes.iter().enumerate() {
            let code = procedure.code.trim();
            if code.is_empty() {
                return Err(BillingError::invalid_input(
                    format!("codes[{idx}].code"),
                    "procedure code must not be blank",
                ));
            }
            if procedure.units == 0 {
                return Err(BillingError::invalid_input(
                    format!("codes[{idx}].units"),
                    format!("units must be at least 1 for {code}"),
                ));
            }

            let (unit_fee, source) = match self.fees.resolve(code) {
                Some(resolved) => (resolved.unit_fee, resolved.source),
                None => match self.policy.unknown_code {
                    UnknownCodePolicy::Reject => {
                        return Err(BillingError::UnknownCode(code.to_string()));
                    }
                    UnknownCodePolicy::ZeroFee => {
                        warn!(code, "Unlisted procedure code priced at zero");
                        (Decimal::ZERO, FeeSource::Unlisted)
                    }
                },
            };
            if unit_fee < Decimal::ZERO {
                return Err(BillingError::invalid_input(
                    format!("codes[{idx}].fee"),
                    format!("fee for {code} must not be negative, got {unit_fee}"),
                ));
            }

            let total_fee = unit_fee
                .checked_mul(Decimal::from(procedure.units))
                .map(round_currency)
                .ok_or_else(|| {
                    BillingError::invalid_input(
                        format!("codes[{idx}].units"),
                        format!("line total for {code} overflows"),
                    )
                })?;

            lines.push(PricedLine {
                procedure,
                code,
                unit_fee,
                total_fee,
                source,
                category: self.categories.classify(code),
            });
        }
        Ok(lines)
    }
}

fn validate_percent(field: &str, percent: Decimal) -> BillingResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(BillingError::invalid_input(
            field,
            format!("must be between 0 and 100, got {percent}"),
        ));
    }
    Ok(())
}

/// One-shot insured calculation with the default category table and policy
///
/// # Errors
///
/// See [`ChargeCalculator::calculate_insured`].
pub fn calculate_insured_charges(
    codes: &[ProcedureCode],
    fee_schedule: &FeeScheduleConfig,
    benefits: &InsuranceBenefits,
) -> BillingResult<CalculationResult> {
    calculator_for(fee_schedule)?.calculate_insured(codes, benefits)
}

/// One-shot self-pay calculation with the default category table and policy
///
/// # Errors
///
/// See [`ChargeCalculator::calculate_self_pay`].
pub fn calculate_self_pay_charges(
    codes: &[ProcedureCode],
    fee_schedule: &FeeScheduleConfig,
    discount_percent: Option<Decimal>,
) -> BillingResult<SelfPayResult> {
    calculator_for(fee_schedule)?.calculate_self_pay(codes, discount_percent)
}

fn calculator_for(fee_schedule: &FeeScheduleConfig) -> BillingResult<ChargeCalculator> {
    ChargeCalculator::new(
        fee_schedule.clone(),
        CategoryTable::default(),
        CalculationPolicy::default(),
    )
}

/// Borrow `calculator` unless per-request rates require a merged copy
///
/// # Errors
///
/// Fails if an override is invalid.
pub fn with_overrides<'a>(
    calculator: &'a ChargeCalculator,
    overrides: &BTreeMap<String, Decimal>,
) -> BillingResult<Cow<'a, ChargeCalculator>> {
    if overrides.is_empty() {
        Ok(Cow::Borrowed(calculator))
    } else {
        calculator.with_practice_rates(overrides).map(Cow::Owned)
    }
}
