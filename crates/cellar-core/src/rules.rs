//! # Pricing Rules
//!
//! The environment a line item is resolved in: the unit table plus the
//! defaults applied to fields a config leaves out.
//!
//! Rules are shared immutably behind an `Arc`. Every `LineItem` keeps the
//! rules it was resolved with so that later updates (a unit change, a new
//! price) re-resolve under the same table.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::units::{UnitTable, DEFAULT_UNIT};
use crate::validation::{validate_finite, validate_unit_symbol, ValidationResult};

/// VAT percentage applied when a config does not carry one.
pub const DEFAULT_VAT_RATE: f64 = 25.5;

/// Unit table and defaults used while resolving line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRules {
    units: UnitTable,
    default_vat_rate: f64,
    default_unit: String,
}

impl PricingRules {
    /// Creates rules from their parts.
    ///
    /// ## Rules
    /// - The default VAT rate must be finite
    /// - The default unit must be a valid symbol
    pub fn new(
        units: UnitTable,
        default_vat_rate: f64,
        default_unit: impl Into<String>,
    ) -> ValidationResult<Self> {
        let default_unit = default_unit.into();
        validate_finite("default vat rate", default_vat_rate)?;
        validate_unit_symbol(&default_unit)?;

        Ok(PricingRules {
            units,
            default_vat_rate,
            default_unit,
        })
    }

    /// Process-wide shared copy of the default rules.
    pub fn shared_default() -> Arc<PricingRules> {
        static DEFAULT: OnceLock<Arc<PricingRules>> = OnceLock::new();
        DEFAULT
            .get_or_init(|| Arc::new(PricingRules::default()))
            .clone()
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn default_vat_rate(&self) -> f64 {
        self.default_vat_rate
    }

    pub fn default_unit(&self) -> &str {
        &self.default_unit
    }

    /// Multiplier for a unit symbol (1 when unknown).
    #[inline]
    pub fn multiplier(&self, unit: &str) -> u32 {
        self.units.multiplier(unit)
    }
}

impl Default for PricingRules {
    /// Built-in units, 25.5% VAT, sold by the bottle.
    fn default() -> Self {
        PricingRules {
            units: UnitTable::default(),
            default_vat_rate: DEFAULT_VAT_RATE,
            default_unit: DEFAULT_UNIT.to_string(),
        }
    }
}
