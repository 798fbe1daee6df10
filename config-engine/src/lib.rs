//! Layered configuration management for DermCare Engine
//!
//! Settings are assembled from an ordered list of sources, later sources
//! overriding earlier ones:
//!
//! 1. the type's own `Default` (serialized defaults)
//! 2. configuration files (YAML or TOML, chosen by extension)
//! 3. prefixed environment variables (`__` separates nested keys)
//!
//! The merged value is then checked through [`ConfigValidator`] so that a
//! service never starts with settings it would reject at request time.
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::{ConfigEngine, ConfigSource, ConfigValidator};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct AppConfig {
//!     bind_address: String,
//! }
//!
//! impl ConfigValidator for AppConfig {
//!     fn validate(&self) -> config_engine::Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let config: AppConfig = ConfigEngine::new()
//!     .add_source(ConfigSource::file("dermcare.yaml"))
//!     .add_source(ConfigSource::env("DERMCARE_"))
//!     .load()?;
//! # Ok::<(), config_engine::ConfigError>(())
//! ```

pub mod engine;
pub mod providers;
pub mod validation;
pub mod error;

pub use engine::*;
pub use providers::*;
pub use validation::*;
pub use error::*;
