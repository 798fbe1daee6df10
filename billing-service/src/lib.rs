//! Checkout charge calculation for dermatology encounters
//!
//! Turns the procedure codes of a finished visit into what the patient owes
//! at the front desk:
//! - Fee resolution against practice rates and the default dermatology table
//! - Insured cost-share: deductible, encounter copay, coinsurance, HSA tagging
//! - Self-pay pricing with an optional cash discount
//! - An HTTP checkout-summary endpoint for front-desk clients
//!
//! # Example
//!
//! ```rust
//! use billing_service::{ChargeCalculator, ProcedureCode};
//! use rust_decimal::Decimal;
//!
//! let calculator = ChargeCalculator::default();
//! let codes = vec![ProcedureCode::new("99213", "Established patient visit", 1)];
//! let summary = calculator.calculate_self_pay(&codes, Some(Decimal::from(15))).unwrap();
//! assert_eq!(summary.total_patient_responsibility, Decimal::new(127_50, 2));
//! ```

pub mod models;
pub mod money;
pub mod error;
pub mod fee_schedule;
pub mod classification;
pub mod calculator;
pub mod settings;
pub mod service;
pub mod api;

pub use models::*;
pub use money::*;
pub use error::*;
pub use fee_schedule::*;
pub use classification::*;
pub use calculator::*;
pub use settings::*;
pub use service::*;
