//! Common error handling utilities for DermCare Engine
//!
//! This crate provides the error vocabulary shared by the DermCare services:
//! stable error codes for API responses, a platform-level error type that
//! service errors convert into, request context for correlation, and an
//! error reporter that emits structured `tracing` events.
//!
//! # Error Categories
//!
//! - **Validation**: malformed or out-of-range input, rejected before any work
//! - **BusinessRule**: well-formed input that violates a billing rule
//! - **Config**: settings that could not be loaded or failed validation
//! - **Internal**: anything else
//!
//! # Example
//!
//! ```rust
//! use error_common::{codes, DermCareError, ErrorContext, ErrorReporter};
//!
//! fn check_units(units: u32) -> Result<(), DermCareError> {
//!     if units == 0 {
//!         return Err(DermCareError::validation(
//!             codes::validation::OUT_OF_RANGE,
//!             "units must be at least 1",
//!         )
//!         .with_field("units"));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_units(0).unwrap_err();
//! let report = ErrorReporter::new().report(&err, &ErrorContext::new());
//! assert_eq!(report.code, "VALIDATION_1004");
//! ```

pub mod types;
pub mod context;
pub mod codes;
pub mod reporting;

pub use types::*;
pub use context::*;
pub use reporting::*;
