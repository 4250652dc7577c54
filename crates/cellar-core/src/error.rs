//! # Error Types
//!
//! Domain-specific error types for cellar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cellar-core errors (this file)                                        │
//! │  ├── PricingError     - Resolution / update / import failures          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cellar-config errors (separate crate)                                 │
//! │  └── ConfigError      - File, TOML and environment failures            │
//! │                                                                         │
//! │  Flow: ValidationError → PricingError → anyhow (CLI) → stderr          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Some situations look like failures but are deliberately non-fatal:
//! - Unknown unit symbol while resolving: multiplier falls back to 1
//! - Unknown item id in remove/update/bulk operations: no-op
//! - Margin of exactly 100%: gross is pinned to 0 instead of dividing by zero

use thiserror::Error;

// =============================================================================
// Pricing Error
// =============================================================================

/// Errors produced while resolving, updating or importing priced items.
///
/// No operation partially applies: when one of these is returned, every
/// previously returned `LineItem` and `Offer` is untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// The input failed validation (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An exported line item could not be turned back into a resolved item.
    ///
    /// ## When This Occurs
    /// - The export JSON is missing required keys
    /// - The export JSON carries a value of the wrong type
    #[error("Invalid line item export: {reason}")]
    InvalidExport { reason: String },
}

impl PricingError {
    pub fn invalid_export(reason: impl Into<String>) -> Self {
        Self::InvalidExport {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Construction is refused when one of these is raised; there is never a
/// half-resolved line item.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: f64 },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., empty unit symbol).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================
