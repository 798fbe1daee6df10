// Error codes implementation
// Stable identifiers returned to API callers; never renumber an existing code.

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
    pub const OUT_OF_RANGE: &str = "VALIDATION_1004";
}

pub mod billing {
    pub const UNKNOWN_PROCEDURE_CODE: &str = "BILLING_5001";
    pub const INCONSISTENT_BENEFITS: &str = "BILLING_5002";
    pub const INVALID_FEE_SCHEDULE: &str = "BILLING_5003";
}

pub mod configuration {
    pub const INVALID_CONFIGURATION: &str = "CONFIG_6001";
    pub const SOURCE_UNREADABLE: &str = "CONFIG_6002";
}

pub mod system {
    pub const INTERNAL: &str = "SYS_9001";
}
