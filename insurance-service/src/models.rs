use chrono::NaiveDate;
use logger_redacted::PiiRedactor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which flat copay an encounter is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopayType {
    Office,
    Specialist,
    Procedure,
}

/// Patient benefit accumulation state as of the encounter date.
///
/// A read-only snapshot; nothing in checkout mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceBenefits {
    pub carrier: String,
    pub plan: String,
    pub member_id: String,
    pub office_visit_copay: Decimal,
    pub specialist_copay: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure_copay: Option<Decimal>,
    pub deductible_total: Decimal,
    pub deductible_met: Decimal,
    pub deductible_remaining: Decimal,
    pub is_deductible_met: bool,
    /// Patient share after the deductible, 0-100
    pub coinsurance_percent: Decimal,
    #[serde(default)]
    pub is_hdhp: bool,
    #[serde(default)]
    pub hsa_eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,
}

/// Where the patient stands against the deductible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductibleStatus {
    Met,
    Outstanding { remaining: Decimal },
}

impl InsuranceBenefits {
    /// Zero cost-share benefits with the deductible already met
    pub fn new(
        carrier: impl Into<String>,
        plan: impl Into<String>,
        member_id: impl Into<String>,
    ) -> Self {
        Self {
            carrier: carrier.into(),
            plan: plan.into(),
            member_id: member_id.into(),
            office_visit_copay: Decimal::ZERO,
            specialist_copay: Decimal::ZERO,
            procedure_copay: None,
            deductible_total: Decimal::ZERO,
            deductible_met: Decimal::ZERO,
            deductible_remaining: Decimal::ZERO,
            is_deductible_met: true,
            coinsurance_percent: Decimal::ZERO,
            is_hdhp: false,
            hsa_eligible: false,
            as_of: None,
        }
    }

    #[must_use]
    pub fn with_copays(
        mut self,
        office: Decimal,
        specialist: Decimal,
        procedure: Option<Decimal>,
    ) -> Self {
        self.office_visit_copay = office;
        self.specialist_copay = specialist;
        self.procedure_copay = procedure;
        self
    }

    /// Set the deductible accumulators, deriving `remaining` and the met flag
    #[must_use]
    pub fn with_deductible(mut self, total: Decimal, met: Decimal) -> Self {
        self.deductible_total = total;
        self.deductible_met = met;
        self.deductible_remaining = (total - met).max(Decimal::ZERO);
        self.is_deductible_met = self.deductible_remaining.is_zero();
        self
    }

    #[must_use]
    pub fn with_coinsurance(mut self, percent: Decimal) -> Self {
        self.coinsurance_percent = percent;
        self
    }

    #[must_use]
    pub fn with_hdhp(mut self, hsa_eligible: bool) -> Self {
        self.is_hdhp = true;
        self.hsa_eligible = hsa_eligible;
        self
    }

    #[must_use]
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }

    /// Copay amount for `copay_type`; procedure falls back to specialist
    pub fn copay_for(&self, copay_type: CopayType) -> Decimal {
        match copay_type {
            CopayType::Office => self.office_visit_copay,
            CopayType::Specialist => self.specialist_copay,
            CopayType::Procedure => self.procedure_copay.unwrap_or(self.specialist_copay),
        }
    }

    pub fn deductible_status(&self) -> DeductibleStatus {
        if !self.is_deductible_met && self.deductible_remaining > Decimal::ZERO {
            DeductibleStatus::Outstanding {
                remaining: self.deductible_remaining,
            }
        } else {
            DeductibleStatus::Met
        }
    }

    /// HDHP plan paired with an HSA
    pub fn hsa_qualified(&self) -> bool {
        self.is_hdhp && self.hsa_eligible
    }

    /// Member ID safe for logs
    pub fn redacted_member_id(&self, redactor: &PiiRedactor) -> String {
        redactor.redact_identifier(&self.member_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> InsuranceBenefits {
        InsuranceBenefits::new("Aetna", "Choice POS II", "W123456789")
            .with_copays(dec!(25), dec!(40), None)
            .with_deductible(dec!(1500), dec!(1200))
            .with_coinsurance(dec!(20))
    }

    #[test]
    fn test_with_deductible_derives_remaining() {
        let benefits = sample();
        assert_eq!(benefits.deductible_remaining, dec!(300));
        assert!(!benefits.is_deductible_met);
        assert_eq!(
            benefits.deductible_status(),
            DeductibleStatus::Outstanding { remaining: dec!(300) }
        );
    }

    #[test]
    fn test_fully_met_deductible() {
        let benefits = sample().with_deductible(dec!(1500), dec!(1500));
        assert!(benefits.is_deductible_met);
        assert_eq!(benefits.deductible_status(), DeductibleStatus::Met);
    }

    #[test]
    fn test_procedure_copay_falls_back_to_specialist() {
        let benefits = sample();
        assert_eq!(benefits.copay_for(CopayType::Procedure), dec!(40));

        let benefits = benefits.with_copays(dec!(25), dec!(40), Some(dec!(75)));
        assert_eq!(benefits.copay_for(CopayType::Procedure), dec!(75));
        assert_eq!(benefits.copay_for(CopayType::Office), dec!(25));
    }

    #[test]
    fn test_hsa_requires_both_flags() {
        let mut benefits = sample();
        assert!(!benefits.hsa_qualified());
        benefits.is_hdhp = true;
        assert!(!benefits.hsa_qualified());
        assert!(benefits.with_hdhp(true).hsa_qualified());
    }

    #[test]
    fn test_member_id_is_masked() {
        let benefits = sample();
        assert_eq!(benefits.redacted_member_id(&PiiRedactor::default()), "******6789");
    }

    #[test]
    fn test_deserializes_with_optional_fields_absent() {
        let json = r#"{
            "carrier": "BCBS",
            "plan": "PPO",
            "member_id": "XYZ1",
            "office_visit_copay": "20",
            "specialist_copay": 45,
            "deductible_total": 1000,
            "deductible_met": 1000,
            "deductible_remaining": 0,
            "is_deductible_met": true,
            "coinsurance_percent": 10
        }"#;
        let benefits: InsuranceBenefits = serde_json::from_str(json).unwrap();
        assert_eq!(benefits.office_visit_copay, dec!(20));
        assert_eq!(benefits.specialist_copay, dec!(45));
        assert_eq!(benefits.procedure_copay, None);
        assert!(!benefits.is_hdhp);
    }
}
