use config_engine::{ConfigEngine, ConfigError, ConfigSource, ConfigValidator};
use logger_redacted::LoggerConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calculator::{CalculationPolicy, ChargeCalculator};
use crate::classification::CategoryTable;
use crate::error::BillingResult;
use crate::fee_schedule::FeeScheduleConfig;

/// Environment prefix; nested keys are separated by `__`,
/// e.g. `DERMCARE_SERVER__BIND_ADDRESS`
pub const ENV_PREFIX: &str = "DERMCARE_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Practice-level checkout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingSettings {
    pub fee_schedule: FeeScheduleConfig,
    pub categories: CategoryTable,
    pub policy: CalculationPolicy,
    /// Used when a self-pay checkout asks for the discount without a rate
    pub default_self_pay_discount_percent: Decimal,
    pub server: ServerSettings,
    pub logging: LoggerConfig,
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            fee_schedule: FeeScheduleConfig::default(),
            categories: CategoryTable::default(),
            policy: CalculationPolicy::default(),
            default_self_pay_discount_percent: Decimal::from(15),
            server: ServerSettings::default(),
            logging: LoggerConfig::default(),
        }
    }
}

impl ConfigValidator for BillingSettings {
    fn validate(&self) -> config_engine::Result<()> {
        let percent = self.default_self_pay_discount_percent;
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(ConfigError::ValidationError(format!(
                "default_self_pay_discount_percent must be between 0 and 100, got {percent}"
            )));
        }
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.bind_address must not be empty".to_string(),
            ));
        }
        self.fee_schedule
            .validate()
            .and_then(|()| self.categories.validate())
            .map_err(|err| ConfigError::ValidationError(err.to_string()))
    }
}

impl BillingSettings {
    /// Defaults, then `path` if given, then `DERMCARE_*` variables.
    ///
    /// # Errors
    ///
    /// Fails if `path` is missing or unparsable, or the merged settings are
    /// invalid.
    pub fn load(path: Option<&Path>) -> BillingResult<Self> {
        let mut engine = ConfigEngine::new();
        if let Some(path) = path {
            engine = engine.add_source(ConfigSource::file(path));
        }
        let settings: Self = engine.add_source(ConfigSource::env(ENV_PREFIX)).load()?;

        tracing::info!(
            practice_rates = settings.fee_schedule.practice_rates.len(),
            category_rules = settings.categories.rules().len(),
            deductible_policy = ?settings.policy.deductible,
            "Billing settings loaded"
        );
        Ok(settings)
    }

    /// # Errors
    ///
    /// Fails if the fee schedule or category table is invalid.
    pub fn calculator(&self) -> BillingResult<ChargeCalculator> {
        ChargeCalculator::new(self.fee_schedule.clone(), self.categories.clone(), self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{DeductiblePolicy, UnknownCodePolicy};
    use crate::error::BillingError;
    use crate::models::ChargeCategory;
    use figment::Jail;
    use rust_decimal_macros::dec;

    fn jail_err(err: BillingError) -> figment::Error {
        figment::Error::from(err.to_string())
    }

    #[test]
    fn test_defaults() {
        let settings = BillingSettings::default();
        assert_eq!(settings.default_self_pay_discount_percent, dec!(15));
        assert_eq!(settings.policy, CalculationPolicy::default());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_yaml_practice_settings() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "dermcare.yaml",
                r#"
fee_schedule:
  practice_rates:
    "99243": 300
    "11102": "155.50"
policy:
  deductible: cumulative
  unknown_code: zero_fee
default_self_pay_discount_percent: 20
categories:
  - { start: "17110", end: "17111", category: office_visit }
  - { start: "99202", end: "99215", category: office_visit }
"#,
            )?;

            let settings =
                BillingSettings::load(Some(Path::new("dermcare.yaml"))).map_err(jail_err)?;
            assert_eq!(settings.fee_schedule.practice_rates.get("99243"), Some(&dec!(300)));
            assert_eq!(settings.fee_schedule.practice_rates.get("11102"), Some(&dec!(155.50)));
            // defaults survive a partial fee_schedule section
            assert_eq!(settings.fee_schedule.default_rates.get("99213"), Some(&dec!(150)));
            assert_eq!(settings.policy.deductible, DeductiblePolicy::Cumulative);
            assert_eq!(settings.policy.unknown_code, UnknownCodePolicy::ZeroFee);
            assert_eq!(settings.default_self_pay_discount_percent, dec!(20));
            assert_eq!(settings.categories.classify("17110"), ChargeCategory::OfficeVisit);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("dermcare.toml", "default_self_pay_discount_percent = 10\n")?;
            jail.set_env("DERMCARE_DEFAULT_SELF_PAY_DISCOUNT_PERCENT", "12.5");
            jail.set_env("DERMCARE_SERVER__BIND_ADDRESS", "127.0.0.1:9090");

            let settings =
                BillingSettings::load(Some(Path::new("dermcare.toml"))).map_err(jail_err)?;
            assert_eq!(settings.default_self_pay_discount_percent, dec!(12.5));
            assert_eq!(settings.server.bind_address, "127.0.0.1:9090");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_discount_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("DERMCARE_DEFAULT_SELF_PAY_DISCOUNT_PERCENT", "120");
            let result = BillingSettings::load(None);
            assert!(matches!(
                result,
                Err(BillingError::Config(ConfigError::ValidationError(_)))
            ));
            Ok(())
        });
    }

    #[test]
    fn test_negative_practice_rate_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "dermcare.yaml",
                "fee_schedule:\n  practice_rates:\n    \"99213\": -10\n",
            )?;
            let result = BillingSettings::load(Some(Path::new("dermcare.yaml")));
            assert!(matches!(
                result,
                Err(BillingError::Config(ConfigError::ValidationError(_)))
            ));
            Ok(())
        });
    }

    #[test]
    fn test_calculator_uses_settings() {
        let mut settings = BillingSettings::default();
        settings.fee_schedule.practice_rates.insert("99213".to_string(), dec!(175));
        let calculator = settings.calculator().unwrap();
        assert_eq!(calculator.fee_schedule().resolve("99213").unwrap().unit_fee, dec!(175));
    }
}
