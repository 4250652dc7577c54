//! # Validation Module
//!
//! Input validation for pricing inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Type checks (number vs string)                                    │
//! │  └── Unknown keys are ignored                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── price present, finite, non-negative                               │
//! │  ├── every other supplied number finite                                │
//! │  └── rounding steps and unit multipliers positive                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Resolver                                                     │
//! │  └── Division guards (price 0, margin 100%)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cellar_core::validation::{validate_price, validate_step};
//!
//! assert!(validate_price(Some(19.89)).is_ok());
//! assert!(validate_price(None).is_err());
//! assert!(validate_step("step", 0.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::ItemConfig;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the vendor price and returns it.
///
/// ## Rules
/// - Must be present
/// - Must be finite
/// - Must be non-negative (zero is allowed for free items)
///
/// ## Example
/// ```rust
/// use cellar_core::validation::validate_price;
///
/// assert_eq!(validate_price(Some(0.0)).unwrap(), 0.0);
/// assert!(validate_price(Some(-1.0)).is_err());
/// assert!(validate_price(Some(f64::NAN)).is_err());
/// ```
pub fn validate_price(price: Option<f64>) -> ValidationResult<f64> {
    let price = price.ok_or_else(|| ValidationError::Required {
        field: "price".to_string(),
    })?;

    validate_finite("price", price)?;

    if price < 0.0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
            value: price,
        });
    }

    Ok(price)
}

/// Validates that a number is neither NaN nor infinite.
pub fn validate_finite(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an optional number: absent is fine, present must be finite.
pub fn validate_optional_finite(field: &str, value: Option<f64>) -> ValidationResult<()> {
    match value {
        Some(v) => validate_finite(field, v),
        None => Ok(()),
    }
}

/// Validates a rounding step.
///
/// ## Rules
/// - Must be finite
/// - Must be strictly positive (a zero step would divide by zero)
pub fn validate_step(field: &str, step: f64) -> ValidationResult<()> {
    validate_finite(field, step)?;

    if step <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Validators
// =============================================================================

/// Validates a unit symbol.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must not contain whitespace
pub fn validate_unit_symbol(symbol: &str) -> ValidationResult<()> {
    let trimmed = symbol.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: "unit".to_string(),
        });
    }

    if trimmed.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "unit".to_string(),
            reason: format!("'{}' must not contain whitespace", trimmed),
        });
    }

    Ok(())
}

/// Validates a unit multiplier (number of base units per sale unit).
pub fn validate_multiplier(symbol: &str, multiplier: u32) -> ValidationResult<()> {
    if multiplier == 0 {
        return Err(ValidationError::MustBePositive {
            field: format!("multiplier for unit '{}'", symbol),
        });
    }

    Ok(())
}

// =============================================================================
// Config Validators
// =============================================================================

/// Validates a full item config before resolution.
///
/// Returns the validated price so the resolver never re-reads the option.
pub fn validate_item_config(config: &ItemConfig) -> ValidationResult<f64> {
    let price = validate_price(config.price)?;

    validate_optional_finite("discount", config.discount)?;
    validate_optional_finite("pricePerBottle", config.price_per_bottle)?;
    validate_optional_finite("margin", config.margin)?;
    validate_optional_finite("gross", config.gross)?;
    validate_optional_finite("customerPrice", config.customer_price)?;
    validate_optional_finite("vatRate", config.vat_rate)?;
    validate_optional_finite("glassPrice", config.glass_price)?;

    if let Some(unit) = config.unit.as_deref() {
        validate_unit_symbol(unit)?;
    }

    Ok(price)
}

// =============================================================================
// Unit Tests
// =============================================================================
