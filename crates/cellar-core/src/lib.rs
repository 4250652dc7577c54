//! # cellar-core: Pure Pricing Logic for Cellar Offers
//!
//! This crate holds the offer pricing engine: sparse line item configs go
//! in, fully priced line items and offer totals come out. It has no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cellar Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cellar-cli (binary)                          │   │
//! │  │    read draft JSON ──► price ──► round ──► print export JSON    │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────┐   ┌───────────────▼────────────────┐  │
//! │  │  cellar-config              │   │  ★ cellar-core (THIS CRATE) ★  │  │
//! │  │  pricing.toml + env vars    │──►│                                │  │
//! │  │  ──► PricingRules           │   │  units   rules   money         │  │
//! │  └─────────────────────────────┘   │  item    offer   validation    │  │
//! │                                    │                                │  │
//! │                                    │  NO I/O • PURE FUNCTIONS       │  │
//! │                                    └────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`item`] - `LineItem` resolution, provenance, updates
//! - [`offer`] - `Offer` aggregate and totals
//! - [`money`] - Cent rounding and step snapping
//! - [`units`] - Unit symbol to multiplier table
//! - [`rules`] - Unit table plus defaults, shared by items
//! - [`types`] - Config, patch and selection types
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks
//!
//! ## Design Principles
//!
//! 1. **Immutable Values**: items and offers never change; operations return new ones
//! 2. **No I/O**: file and environment access live in `cellar-config` and the CLI
//! 3. **Cent Rounding**: every stored money value is rounded to 2 decimals, ties up
//! 4. **Explicit Errors**: invalid input is a typed error, never a half-built item
//!
//! ## Example Usage
//!
//! ```rust
//! use cellar_core::{ItemConfig, ItemSelection, LineItem, Offer, OfferConfig};
//!
//! let wine = LineItem::resolve(ItemConfig {
//!     margin: Some(70.0),
//!     vat_rate: Some(25.5),
//!     ..ItemConfig::new(34.99)
//! }).unwrap();
//!
//! assert_eq!(wine.gross(), 81.64);
//! assert_eq!(wine.customer_price(), 146.37);
//!
//! let offer = Offer::new(OfferConfig {
//!     items: vec![wine],
//!     ..OfferConfig::default()
//! });
//! let rounded = offer.round_customer_prices(1.0, &ItemSelection::All).unwrap();
//!
//! assert_eq!(rounded.items()[0].customer_price(), 146.0);
//! assert_eq!(offer.items()[0].customer_price(), 146.37);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod item;
pub mod money;
pub mod offer;
pub mod rules;
pub mod types;
pub mod units;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{PricingError, PricingResult, ValidationError};
pub use item::{LineItem, LineItemExport, MarkupAnchor, Origin, Provenance};
pub use money::{round_money, snap_to_step};
pub use offer::{Offer, OfferConfig, OfferExport};
pub use rules::PricingRules;
pub use types::*;
pub use units::UnitTable;

// =============================================================================
// Crate-Level Helpers
// =============================================================================

/// Fresh identifier for items and offers created without one.
pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
