//! Provenance ledger and the serialized line item shape.
//!
//! A resolved item remembers, for each of pricePerBottle, gross and
//! customerPrice, whether the value was supplied by the caller or derived.
//! The ledger drives selective re-emission: `to_config` writes a
//! dependent field back out only when it was explicit, so reconstructing
//! from the config reproduces the same item instead of freezing values that
//! should stay derived.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::PricingError;
use crate::item::LineItem;
use crate::rules::PricingRules;
use crate::types::{ItemConfig, ItemData};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Origin {
    /// Supplied by the caller.
    Explicit,
    /// Computed by the resolver.
    #[default]
    Derived,
}

impl Origin {
    /// `Explicit` when the value was supplied.
    pub fn of<T>(value: &Option<T>) -> Self {
        if value.is_some() {
            Origin::Explicit
        } else {
            Origin::Derived
        }
    }

    pub fn is_explicit(self) -> bool {
        self == Origin::Explicit
    }

    /// Keeps `value` only when explicit.
    fn keep(self, value: f64) -> Option<f64> {
        self.is_explicit().then_some(value)
    }
}

/// Origin of each dependent field of a line item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Provenance {
    #[serde(default)]
    pub price_per_bottle: Origin,
    #[serde(default)]
    pub gross: Origin,
    #[serde(default)]
    pub customer_price: Origin,
}

// =============================================================================
// Config Emission
// =============================================================================

impl LineItem {
    /// Emits the minimal config that reproduces this item.
    ///
    /// ## Emission Rules
    /// - price, discount, unit, quantity, vatRate, tags, availableUnits,
    ///   glassPrice and data are always emitted
    /// - pricePerBottle, gross and customerPrice only when explicit
    /// - margin unless customerPrice is explicit
    ///
    /// ## Example
    /// ```rust
    /// use cellar_core::{ItemConfig, LineItem};
    ///
    /// let item = LineItem::resolve(ItemConfig {
    ///     margin: Some(40.0),
    ///     ..ItemConfig::new(10.0)
    /// }).unwrap();
    ///
    /// let config = item.to_config();
    /// assert_eq!(config.margin, Some(40.0));
    /// assert_eq!(config.gross, None);
    /// assert_eq!(LineItem::resolve(config).unwrap(), item);
    /// ```
    pub fn to_config(&self) -> ItemConfig {
        let provenance = self.provenance();

        ItemConfig {
            id: Some(self.id().to_string()),
            price: Some(self.price()),
            discount: Some(self.discount()),
            price_per_bottle: provenance.price_per_bottle.keep(self.price_per_bottle()),
            margin: (!provenance.customer_price.is_explicit()).then_some(self.margin()),
            gross: provenance.gross.keep(self.gross()),
            customer_price: provenance.customer_price.keep(self.customer_price()),
            unit: Some(self.unit().to_string()),
            quantity: Some(self.quantity()),
            vat_rate: Some(self.vat_rate()),
            tags: self.tags().to_vec(),
            available_units: Some(self.available_units().to_vec()),
            glass_price: self.glass_price(),
            data: self.data().clone(),
        }
    }
}

// =============================================================================
// Export Shape
// =============================================================================

/// Serialized form of a line item: config fields, computed fields and the
/// provenance ledger.
///
/// Importing trusts only the config fields and the ledger; the computed
/// fields are re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItemExport {
    pub id: String,
    pub price: f64,
    pub discount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub margin: Option<f64>,
    pub unit: String,
    pub quantity: u32,
    pub vat_rate: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub available_units: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub glass_price: Option<f64>,
    #[serde(default)]
    pub data: ItemData,

    pub price_per_bottle: f64,
    pub price_per_unit: f64,
    pub gross: f64,
    pub vat_amount: f64,
    pub customer_price: f64,
    pub total_price: f64,

    #[serde(default)]
    pub provenance: Provenance,
}

impl From<LineItem> for LineItemExport {
    fn from(item: LineItem) -> Self {
        LineItemExport::from(&item)
    }
}

impl From<&LineItem> for LineItemExport {
    fn from(item: &LineItem) -> Self {
        let config = item.to_config();

        LineItemExport {
            id: item.id().to_string(),
            price: item.price(),
            discount: item.discount(),
            margin: config.margin,
            unit: item.unit().to_string(),
            quantity: item.quantity(),
            vat_rate: item.vat_rate(),
            tags: config.tags,
            available_units: Some(item.available_units().to_vec()),
            glass_price: item.glass_price(),
            data: config.data,
            price_per_bottle: item.price_per_bottle(),
            price_per_unit: item.price_per_unit(),
            gross: item.gross(),
            vat_amount: item.vat_amount(),
            customer_price: item.customer_price(),
            total_price: item.total_price(),
            provenance: *item.provenance(),
        }
    }
}

impl LineItemExport {
    /// Rebuilds the sparse config this export was produced from.
    pub fn into_config(self) -> ItemConfig {
        let provenance = self.provenance;

        ItemConfig {
            id: Some(self.id),
            price: Some(self.price),
            discount: Some(self.discount),
            price_per_bottle: provenance.price_per_bottle.keep(self.price_per_bottle),
            margin: self.margin,
            gross: provenance.gross.keep(self.gross),
            customer_price: provenance.customer_price.keep(self.customer_price),
            unit: Some(self.unit),
            quantity: Some(self.quantity),
            vat_rate: Some(self.vat_rate),
            tags: self.tags,
            available_units: self.available_units,
            glass_price: self.glass_price,
            data: self.data,
        }
    }

    /// Re-resolves the export under the given rules.
    pub fn resolve_with(self, rules: Arc<PricingRules>) -> Result<LineItem, PricingError> {
        LineItem::resolve_with(self.into_config(), rules)
    }
}

impl TryFrom<LineItemExport> for LineItem {
    type Error = PricingError;

    fn try_from(export: LineItemExport) -> Result<Self, Self::Error> {
        export.resolve_with(PricingRules::shared_default())
    }
}
