//! Insurance Service for Healthcare
//!
//! Provides the insurance side of checkout:
//! - Benefit snapshot model (copays, deductible accumulators, coinsurance)
//! - Copay type selection with procedure → specialist fallback
//! - Deductible status and HSA qualification
//! - Snapshot validation before any cost-share computation
//!
//! Accumulators are read-only here; posting payments against a deductible is
//! the payer's job.

pub mod models;
pub mod validation;
pub mod error;

pub use models::*;
pub use validation::*;
pub use error::*;
