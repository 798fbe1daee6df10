use serde::{Deserialize, Serialize};

use crate::error::{BillingError, BillingResult};
use crate::models::ChargeCategory;

/// Inclusive code range mapped to a category.
///
/// Bounds are compared as strings against codes of the same length, so
/// `10004..=69990` matches CPT surgery codes but not HCPCS `J3301`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub start: String,
    pub end: String,
    pub category: ChargeCategory,
}

impl CategoryRule {
    pub fn range(
        start: impl Into<String>,
        end: impl Into<String>,
        category: ChargeCategory,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            category,
        }
    }

    pub fn exact(code: impl Into<String>, category: ChargeCategory) -> Self {
        let code = code.into();
        Self {
            start: code.clone(),
            end: code,
            category,
        }
    }

    pub fn matches(&self, code: &str) -> bool {
        code.len() == self.start.len() && self.start.as_str() <= code && code <= self.end.as_str()
    }
}

/// Ordered classification rules; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(vec![
            CategoryRule::range("99202", "99205", ChargeCategory::OfficeVisit),
            CategoryRule::range("99211", "99215", ChargeCategory::OfficeVisit),
            CategoryRule::range("99241", "99245", ChargeCategory::Specialist),
            CategoryRule::range("99381", "99397", ChargeCategory::Preventive),
            CategoryRule::range("88300", "88399", ChargeCategory::Pathology),
            CategoryRule::range("96900", "96999", ChargeCategory::Procedure),
            CategoryRule::range("10004", "69990", ChargeCategory::Procedure),
        ])
    }
}

impl CategoryTable {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Rule added ahead of the existing ones
    #[must_use]
    pub fn with_override(mut self, rule: CategoryRule) -> Self {
        self.rules.insert(0, rule);
        self
    }

    pub fn classify(&self, code: &str) -> ChargeCategory {
        self.rules
            .iter()
            .find(|rule| rule.matches(code))
            .map_or(ChargeCategory::Other, |rule| rule.category)
    }

    /// # Errors
    ///
    /// Rejects rules with blank bounds, bounds of different lengths, or a
    /// start after the end.
    pub fn validate(&self) -> BillingResult<()> {
        for (idx, rule) in self.rules.iter().enumerate() {
            let field = format!("categories[{idx}]");
            if rule.start.trim().is_empty() || rule.end.trim().is_empty() {
                return Err(BillingError::invalid_input(field, "rule bounds must not be blank"));
            }
            if rule.start.len() != rule.end.len() {
                return Err(BillingError::invalid_input(
                    field,
                    format!("bounds {}..{} differ in length", rule.start, rule.end),
                ));
            }
            if rule.start > rule.end {
                return Err(BillingError::invalid_input(
                    field,
                    format!("start {} is after end {}", rule.start, rule.end),
                ));
            }
        }
        Ok(())
    }
}
