use insurance_service::MAX_AMOUNT;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{BillingError, BillingResult};
use crate::models::FeeSource;

/// Standard fees for common dermatology CPT codes, in cents.
///
/// Used when the practice has not published its own rate for a code.
const DEFAULT_DERMATOLOGY_FEES: &[(&str, i64)] = &[
    // New patient office visits
    ("99202", 120_00),
    ("99203", 175_00),
    ("99204", 250_00),
    ("99205", 325_00),
    // Established patient office visits
    ("99211", 45_00),
    ("99212", 90_00),
    ("99213", 150_00),
    ("99214", 210_00),
    ("99215", 290_00),
    // Office consultations
    ("99242", 200_00),
    ("99243", 260_00),
    ("99244", 350_00),
    ("99245", 425_00),
    // Preventive visits
    ("99385", 180_00),
    ("99386", 200_00),
    ("99395", 165_00),
    ("99396", 185_00),
    // Biopsies
    ("11102", 140_00),
    ("11103", 70_00),
    ("11104", 160_00),
    ("11105", 80_00),
    ("11106", 185_00),
    ("11107", 95_00),
    // Shaves and excisions
    ("11300", 120_00),
    ("11305", 135_00),
    ("11400", 210_00),
    ("11401", 240_00),
    ("11600", 300_00),
    ("11640", 340_00),
    // Destruction
    ("17000", 110_00),
    ("17003", 15_00),
    ("17004", 250_00),
    ("17110", 125_00),
    ("17111", 165_00),
    // Incision and drainage, injections
    ("10060", 175_00),
    ("11900", 85_00),
    ("11901", 110_00),
    // Phototherapy
    ("96900", 60_00),
    ("96910", 95_00),
    // Surgical pathology
    ("88304", 75_00),
    ("88305", 125_00),
    ("88312", 90_00),
];

pub fn default_dermatology_rates() -> BTreeMap<String, Decimal> {
    DEFAULT_DERMATOLOGY_FEES
        .iter()
        .map(|(code, cents)| ((*code).to_string(), Decimal::new(*cents, 2)))
        .collect()
}

/// Practice rates layered over the default table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeScheduleConfig {
    pub practice_rates: BTreeMap<String, Decimal>,
    pub default_rates: BTreeMap<String, Decimal>,
}

impl Default for FeeScheduleConfig {
    fn default() -> Self {
        Self {
            practice_rates: BTreeMap::new(),
            default_rates: default_dermatology_rates(),
        }
    }
}

/// Per-unit fee and the table it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFee {
    pub unit_fee: Decimal,
    pub source: FeeSource,
}

impl FeeScheduleConfig {
    /// Practice rates over the built-in dermatology defaults
    pub fn with_practice_rates(practice_rates: BTreeMap<String, Decimal>) -> Self {
        Self {
            practice_rates,
            ..Self::default()
        }
    }

    /// Practice first, then the default table
    pub fn resolve(&self, code: &str) -> Option<ResolvedFee> {
        if let Some(fee) = self.practice_rates.get(code) {
            return Some(ResolvedFee {
                unit_fee: *fee,
                source: FeeSource::Practice,
            });
        }
        self.default_rates.get(code).map(|fee| ResolvedFee {
            unit_fee: *fee,
            source: FeeSource::Default,
        })
    }

    /// Copy with `overrides` taking precedence over existing practice rates
    #[must_use]
    pub fn merged_with(&self, overrides: &BTreeMap<String, Decimal>) -> Self {
        let mut merged = self.clone();
        merged
            .practice_rates
            .extend(overrides.iter().map(|(code, fee)| (code.clone(), *fee)));
        merged
    }

    /// # Errors
    ///
    /// Rejects blank codes, negative fees, and fees above [`MAX_AMOUNT`] in
    /// either table.
    pub fn validate(&self) -> BillingResult<()> {
        let tables = [
            ("practice_rates", &self.practice_rates),
            ("default_rates", &self.default_rates),
        ];
        for (table, rates) in tables {
            for (code, fee) in rates {
                if code.trim().is_empty() {
                    return Err(BillingError::invalid_input(
                        table,
                        "fee schedule contains a blank code",
                    ));
                }
                if *fee < Decimal::ZERO || *fee > MAX_AMOUNT {
                    return Err(BillingError::invalid_input(
                        format!("{table}.{code}"),
                        format!("fee must be between 0 and {MAX_AMOUNT}, got {fee}"),
                    ));
                }
            }
        }
        Ok(())
    }
}
