//! # Line Item
//!
//! A single priced product line, fully resolved from a sparse config.
//!
//! ## Resolution Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ItemConfig (sparse)                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate ──► price present, finite, >= 0; other numbers finite         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  defaults ──► id (UUID v4), unit, quantity 1, VAT rate, availableUnits  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  base.rs ──► {discount, pricePerBottle}                                 │
//! │       │                                                                 │
//! │       ├──► pricePerUnit = pricePerBottle × unit multiplier              │
//! │       ▼                                                                 │
//! │  markup.rs ──► {margin, gross, vatAmount, customerPrice}                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  totalPrice = pricePerUnit × quantity                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LineItem + Provenance (ledger.rs)                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `LineItem` is immutable. Every change goes through [`LineItem::update`]
//! (see `update.rs`) and produces a new item. Re-resolving
//! `item.to_config()` reproduces every computed field of `item`; the only
//! field that may move is a margin supplied next to an explicit customer
//! price, which is informational and re-derived.

mod base;
mod ledger;
mod markup;
mod update;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::PricingResult;
use crate::money::round_money;
use crate::rules::PricingRules;
use crate::types::{ItemConfig, ItemData};
use crate::validation::validate_item_config;

use base::BasePrice;
use markup::{Markup, MarkupInput};

pub use ledger::{LineItemExport, Origin, Provenance};
pub use markup::MarkupAnchor;

/// A fully resolved offer line.
///
/// Serializes as [`LineItemExport`]; deserializing re-resolves under the
/// default rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "LineItemExport", try_from = "LineItemExport")]
pub struct LineItem {
    id: String,
    price: f64,
    discount: f64,
    margin: f64,
    unit: String,
    quantity: u32,
    vat_rate: f64,
    tags: Vec<String>,
    available_units: Vec<String>,
    glass_price: Option<f64>,
    data: ItemData,

    price_per_bottle: f64,
    price_per_unit: f64,
    gross: f64,
    vat_amount: f64,
    customer_price: f64,
    total_price: f64,

    anchor: MarkupAnchor,
    provenance: Provenance,
    rules: Arc<PricingRules>,
}

impl LineItem {
    /// Resolves a config under the default rules.
    ///
    /// ## Example
    /// ```rust
    /// use cellar_core::{ItemConfig, LineItem};
    ///
    /// let item = LineItem::resolve(ItemConfig {
    ///     vat_rate: Some(20.0),
    ///     ..ItemConfig::new(100.0)
    /// }).unwrap();
    ///
    /// assert_eq!(item.customer_price(), 120.0);
    /// assert_eq!(item.total_price(), 100.0);
    /// ```
    pub fn resolve(config: ItemConfig) -> PricingResult<Self> {
        Self::resolve_with(config, PricingRules::shared_default())
    }

    /// Resolves a config under the given rules.
    pub fn resolve_with(config: ItemConfig, rules: Arc<PricingRules>) -> PricingResult<Self> {
        let price = validate_item_config(&config)?;

        let id = config
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(crate::generate_id);
        let unit = config
            .unit
            .unwrap_or_else(|| rules.default_unit().to_string());
        let quantity = config.quantity.unwrap_or(1);
        let vat_rate = config.vat_rate.unwrap_or_else(|| rules.default_vat_rate());
        let available_units = config
            .available_units
            .unwrap_or_else(|| vec![rules.default_unit().to_string()]);

        let base = BasePrice::resolve(price, config.discount, config.price_per_bottle);
        let multiplier = rules.multiplier(&unit);
        let price_per_unit = round_money(base.price_per_bottle * f64::from(multiplier));

        let markup = Markup::resolve(MarkupInput {
            price_per_bottle: base.price_per_bottle,
            vat_rate,
            margin: config.margin,
            gross: config.gross,
            customer_price: config.customer_price,
        });

        let total_price = round_money(price_per_unit * f64::from(quantity));

        trace!(
            item_id = %id,
            anchor = ?markup.anchor,
            customer_price = markup.customer_price,
            total_price,
            "Resolved line item"
        );

        Ok(LineItem {
            id,
            price,
            discount: base.discount,
            margin: markup.margin,
            unit,
            quantity,
            vat_rate,
            tags: config.tags,
            available_units,
            glass_price: config.glass_price,
            data: config.data,
            price_per_bottle: base.price_per_bottle,
            price_per_unit,
            gross: markup.gross,
            vat_amount: markup.vat_amount,
            customer_price: markup.customer_price,
            total_price,
            anchor: markup.anchor,
            provenance: Provenance {
                price_per_bottle: base.price_per_bottle_origin,
                gross: markup.gross_origin,
                customer_price: markup.customer_price_origin,
            },
            rules,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Vendor price per base unit, before discount.
    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn vat_rate(&self) -> f64 {
        self.vat_rate
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn available_units(&self) -> &[String] {
        &self.available_units
    }

    pub fn glass_price(&self) -> Option<f64> {
        self.glass_price
    }

    pub fn data(&self) -> &ItemData {
        &self.data
    }

    /// Vendor price after discount, per base unit.
    pub fn price_per_bottle(&self) -> f64 {
        self.price_per_bottle
    }

    /// Vendor price after discount, per sale unit.
    pub fn price_per_unit(&self) -> f64 {
        self.price_per_unit
    }

    pub fn gross(&self) -> f64 {
        self.gross
    }

    pub fn vat_amount(&self) -> f64 {
        self.vat_amount
    }

    /// VAT-inclusive price per base unit.
    pub fn customer_price(&self) -> f64 {
        self.customer_price
    }

    /// Net line total: pricePerUnit × quantity.
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Which member of {customerPrice, gross, margin} anchored resolution.
    pub fn markup_anchor(&self) -> MarkupAnchor {
        self.anchor
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Rules this item was resolved under.
    pub fn rules(&self) -> &Arc<PricingRules> {
        &self.rules
    }

    /// Base units per sale unit for this item's unit.
    pub fn unit_multiplier(&self) -> u32 {
        self.rules.multiplier(&self.unit)
    }

    /// Base units covered by this line: quantity × unit multiplier.
    pub fn total_units(&self) -> u64 {
        u64::from(self.quantity) * u64::from(self.unit_multiplier())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
