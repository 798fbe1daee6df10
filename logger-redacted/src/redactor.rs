use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::config::LoggerConfig;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    static ref PHONE_REGEX: Regex =
        Regex::new(r"(?:\+1[-.\s]?)?\(?\b[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b").unwrap();
    static ref SSN_REGEX: Regex = Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap();
}

/// Number of trailing identifier characters left visible when masking
const VISIBLE_SUFFIX: usize = 4;

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub enabled: bool,
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_ssn: bool,
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redact_emails: true,
            redact_phones: true,
            redact_ssn: true,
            hash_for_correlation: false,
        }
    }
}

/// PII redactor for log fields and error reports
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn from_logger_config(config: &LoggerConfig) -> Self {
        Self::new(RedactionConfig {
            enabled: config.redaction_enabled,
            hash_for_correlation: config.hash_for_correlation,
            ..Default::default()
        })
    }

    /// Redact free text: SSNs, emails, then phone numbers.
    pub fn redact(&self, text: &str) -> String {
        if !self.config.enabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        // SSNs first: the phone pattern would otherwise swallow part of them
        if self.config.redact_ssn {
            result = self.redact_ssn(&result);
        }

        if self.config.redact_emails {
            result = self.redact_emails(&result);
        }

        if self.config.redact_phones {
            result = self.redact_phones(&result);
        }

        result
    }

    /// Mask a structured identifier such as an insurance member ID.
    ///
    /// Keeps the last four characters, or emits a correlation hash when
    /// `hash_for_correlation` is set. Identifiers of four characters or fewer
    /// are fully masked.
    pub fn redact_identifier(&self, value: &str) -> String {
        if !self.config.enabled {
            return value.to_string();
        }
        if self.config.hash_for_correlation {
            return format!("ID[{}]", self.hash_value(value));
        }

        let len = value.chars().count();
        if len <= VISIBLE_SUFFIX {
            return "*".repeat(len);
        }
        let suffix: String = value.chars().skip(len - VISIBLE_SUFFIX).collect();
        format!("{}{}", "*".repeat(len - VISIBLE_SUFFIX), suffix)
    }

    fn redact_emails(&self, text: &str) -> String {
        EMAIL_REGEX.replace_all(text, |caps: &regex::Captures| {
            let email = &caps[0];
            if self.config.hash_for_correlation {
                format!("EMAIL[{}]", self.hash_value(email))
            } else {
                match email.split_once('@') {
                    Some((local, domain)) => format!(
                        "{}***@{}***",
                        local.chars().next().unwrap_or('*'),
                        domain.chars().next().unwrap_or('*')
                    ),
                    None => "***@***".to_string(),
                }
            }
        }).to_string()
    }

    fn redact_phones(&self, text: &str) -> String {
        PHONE_REGEX.replace_all(text, |caps: &regex::Captures| {
            if self.config.hash_for_correlation {
                format!("PHONE[{}]", self.hash_value(&caps[0]))
            } else {
                "(***) ***-****".to_string()
            }
        }).to_string()
    }

    fn redact_ssn(&self, text: &str) -> String {
        SSN_REGEX.replace_all(text, |caps: &regex::Captures| {
            if self.config.hash_for_correlation {
                format!("SSN[{}]", self.hash_value(&caps[0]))
            } else {
                "***-**-****".to_string()
            }
        }).to_string()
    }

    fn hash_value(&self, value: &str) -> String {
        let digest = Sha256::digest(value.as_bytes());
        general_purpose::STANDARD.encode(&digest[..8]) // first 8 bytes keep it short
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn masking_redactor() -> PiiRedactor {
        PiiRedactor::new(RedactionConfig::default())
    }

    #[test]
    fn test_email_redaction() {
        let redacted = masking_redactor().redact("Statement sent to john.doe@example.com");
        assert!(redacted.contains("j***@e***"));
        assert!(!redacted.contains("john.doe"));
    }

    #[test]
    fn test_phone_redaction() {
        let redacted = masking_redactor().redact("Call me at (555) 123-4567");
        assert!(redacted.contains("(***) ***-****"));
    }

    #[test]
    fn test_ssn_redaction() {
        let redacted = masking_redactor().redact("SSN on file 123-45-6789");
        assert_eq!(redacted, "SSN on file ***-**-****");
    }

    #[test]
    fn test_member_id_keeps_last_four() {
        assert_eq!(masking_redactor().redact_identifier("W123456789"), "******6789");
        assert_eq!(masking_redactor().redact_identifier("A12"), "***");
    }

    #[test]
    fn test_member_id_hash_is_stable() {
        let redactor = PiiRedactor::new(RedactionConfig {
            hash_for_correlation: true,
            ..Default::default()
        });
        let first = redactor.redact_identifier("W123456789");
        assert!(first.starts_with("ID["));
        assert_eq!(first, redactor.redact_identifier("W123456789"));
        assert_ne!(first, redactor.redact_identifier("W123456780"));
    }

    #[test]
    fn test_disabled_redactor_passes_through() {
        let redactor = PiiRedactor::from_logger_config(&LoggerConfig {
            redaction_enabled: false,
            ..Default::default()
        });
        assert_eq!(redactor.redact_identifier("W123456789"), "W123456789");
        assert_eq!(redactor.redact("a@b.co"), "a@b.co");
    }
}
