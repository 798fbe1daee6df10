use insurance_service::{CopayType, InsuranceBenefits};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Billable service line supplied by the checkout workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureCode {
    pub code: String, // CPT / HCPCS
    pub description: String,
    pub units: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
}

impl ProcedureCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>, units: u32) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            units,
            modifiers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }
}

/// Charge classification, drives copay selection and HSA tagging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeCategory {
    OfficeVisit,
    Specialist,
    Procedure,
    Pathology,
    Preventive,
    Other,
}

impl ChargeCategory {
    /// Copay this category is a candidate for, if any
    pub fn copay_type(self) -> Option<CopayType> {
        match self {
            ChargeCategory::OfficeVisit => Some(CopayType::Office),
            ChargeCategory::Specialist => Some(CopayType::Specialist),
            ChargeCategory::Procedure => Some(CopayType::Procedure),
            ChargeCategory::Pathology | ChargeCategory::Preventive | ChargeCategory::Other => None,
        }
    }

    /// Whether a line may be tagged HSA-eligible on an HSA-paired HDHP.
    ///
    /// Only HSA tagging reads this. Preventive lines still draw down an
    /// outstanding deductible like every other category.
    pub fn is_hsa_taggable(self) -> bool {
        !matches!(self, ChargeCategory::Preventive)
    }

    pub fn label(self) -> &'static str {
        match self {
            ChargeCategory::OfficeVisit => "office visit",
            ChargeCategory::Specialist => "specialist",
            ChargeCategory::Procedure => "procedure",
            ChargeCategory::Pathology => "pathology",
            ChargeCategory::Preventive => "preventive",
            ChargeCategory::Other => "other",
        }
    }
}

/// Which table priced a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeSource {
    Practice,
    Default,
    /// In neither table; priced at zero
    Unlisted,
}

/// Insured result for one procedure code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeLineResult {
    pub code: String,
    pub description: String,
    pub units: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    pub unit_fee: Decimal,
    pub total_fee: Decimal,
    pub copay_applied: Decimal,
    pub deductible_applied: Decimal,
    pub coinsurance_amount: Decimal,
    pub patient_responsibility: Decimal,
    pub applied_to_deductible: bool,
    pub category: ChargeCategory,
    pub is_hsa_eligible: bool,
    pub fee_source: FeeSource,
    pub breakdown: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopayDetails {
    #[serde(rename = "type")]
    pub copay_type: CopayType,
    pub amount: Decimal,
}

/// Insured checkout summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub charges: Vec<ChargeLineResult>,
    pub total_fees: Decimal,
    pub total_patient_responsibility: Decimal,
    pub total_copay: Decimal,
    pub total_deductible: Decimal,
    pub total_coinsurance: Decimal,
    pub total_hsa_eligible: Decimal,
    /// Set when an encounter copay attached to one of the lines
    pub copay_details: Option<CopayDetails>,
}

/// Self-pay result for one procedure code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfPayLineResult {
    pub code: String,
    pub description: String,
    pub units: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<String>,
    pub unit_fee: Decimal,
    pub total_fee: Decimal,
    pub discount: Decimal,
    pub patient_responsibility: Decimal,
    pub fee_source: FeeSource,
    pub breakdown: Vec<String>,
}

/// Self-pay checkout summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfPayResult {
    pub charges: Vec<SelfPayLineResult>,
    /// `None` when no discount was requested
    pub discount_percent: Option<Decimal>,
    pub total_fees: Decimal,
    pub total_discount: Decimal,
    pub total_patient_responsibility: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "payer_type", rename_all = "snake_case")]
pub enum ChargeSummary {
    Insured(CalculationResult),
    SelfPay(SelfPayResult),
}

impl ChargeSummary {
    pub fn total_patient_responsibility(&self) -> Decimal {
        match self {
            ChargeSummary::Insured(result) => result.total_patient_responsibility,
            ChargeSummary::SelfPay(result) => result.total_patient_responsibility,
        }
    }
}

/// Who pays, as seen by the calculator
#[derive(Debug, Clone, PartialEq)]
pub enum Payer {
    Insured(InsuranceBenefits),
    SelfPay { discount_percent: Option<Decimal> },
}

/// Checkout-summary request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub encounter_id: Option<String>,
    pub codes: Vec<ProcedureCode>,
    pub payer: CheckoutPayer,
    /// Per-request practice rates, merged over the configured ones
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub practice_rates: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckoutPayer {
    Insured {
        benefits: InsuranceBenefits,
    },
    SelfPay {
        #[serde(default)]
        apply_discount: bool,
        /// Falls back to the practice default when the discount is applied
        #[serde(default)]
        discount_percent: Option<Decimal>,
    },
}
