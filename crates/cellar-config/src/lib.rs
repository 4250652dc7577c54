//! # cellar-config: Pricing Configuration
//!
//! Loads the unit table and pricing defaults from a TOML file and the
//! environment, and hands them to `cellar-core` as [`PricingRules`].
//!
//! ## Example
//! ```rust
//! use cellar_config::PricingConfig;
//!
//! let config = PricingConfig::from_toml_str(r#"
//!     [defaults]
//!     vat_rate = 24.0
//!
//!     [units]
//!     crate_24 = 24
//! "#).unwrap();
//!
//! let rules = config.to_rules().unwrap();
//! assert_eq!(rules.default_vat_rate(), 24.0);
//! assert_eq!(rules.multiplier("crate_24"), 24);
//! assert_eq!(rules.multiplier("case_6"), 6);
//! ```
//!
//! [`PricingRules`]: cellar_core::PricingRules

pub mod config;
pub mod error;

pub use config::{DefaultsConfig, PricingConfig};
pub use error::{ConfigError, ConfigResult};
