//! # Domain Types
//!
//! Input and patch types shared by the resolver, the update engine and the
//! offer aggregate.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ItemConfig    │   │    ItemPatch    │   │   FieldUpdate   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sparse input   │   │  partial change │   │  one field of   │       │
//! │  │  price required │   │  for update()   │   │  a bulk update  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  ItemSelection  │   │   OfferTotals   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  All | Ids      │   │  net, vat,      │                             │
//! │  │                 │   │  gross          │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All JSON shapes use camelCase keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Opaque caller data carried through untouched.
pub type ItemData = BTreeMap<String, serde_json::Value>;

// =============================================================================
// Item Config
// =============================================================================

/// Sparse construction input for a line item.
///
/// Only `price` is required. The three-way group {margin, gross,
/// customerPrice} and the pair {discount, pricePerBottle} may be partially
/// filled; the resolver decides which member is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemConfig {
    /// Item id. Generated (UUID v4) when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<String>,

    /// Vendor price per base unit, before discount.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price: Option<f64>,

    /// Discount percentage off the vendor price.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub discount: Option<f64>,

    /// Vendor price after discount.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price_per_bottle: Option<f64>,

    /// Markup percentage relative to the pre-VAT sale price.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub margin: Option<f64>,

    /// Absolute profit per base unit, before VAT.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub gross: Option<f64>,

    /// Final VAT-inclusive price per base unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub customer_price: Option<f64>,

    /// Sale unit symbol (bottle, case_6, pallet, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub unit: Option<String>,

    /// Number of sale units. Whole units only.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub quantity: Option<u32>,

    /// VAT percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub vat_rate: Option<f64>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Units this item may be switched to by `Offer::set_unit`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub available_units: Option<Vec<String>>,

    /// Per-glass price. Kept unrounded until explicitly rounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub glass_price: Option<f64>,

    #[serde(default)]
    pub data: ItemData,
}

impl ItemConfig {
    /// Creates a config with only the vendor price set.
    pub fn new(price: f64) -> Self {
        ItemConfig {
            price: Some(price),
            ..ItemConfig::default()
        }
    }

    /// Sets the id (builder style).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// =============================================================================
// Item Patch
// =============================================================================

/// A partial change applied by `LineItem::update`.
///
/// Every field is optional; `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price_per_bottle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub gross: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub customer_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub vat_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub available_units: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub glass_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub data: Option<ItemData>,
}

impl ItemPatch {
    /// Overlays every set field of this patch onto `config`.
    pub fn merge_into(&self, config: &mut ItemConfig) {
        fn overlay<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *target = Some(v.clone());
            }
        }

        overlay(&mut config.id, &self.id);
        overlay(&mut config.price, &self.price);
        overlay(&mut config.discount, &self.discount);
        overlay(&mut config.price_per_bottle, &self.price_per_bottle);
        overlay(&mut config.margin, &self.margin);
        overlay(&mut config.gross, &self.gross);
        overlay(&mut config.customer_price, &self.customer_price);
        overlay(&mut config.unit, &self.unit);
        overlay(&mut config.quantity, &self.quantity);
        overlay(&mut config.vat_rate, &self.vat_rate);
        overlay(&mut config.available_units, &self.available_units);
        overlay(&mut config.glass_price, &self.glass_price);

        if let Some(tags) = &self.tags {
            config.tags = tags.clone();
        }
        if let Some(data) = &self.data {
            config.data = data.clone();
        }
    }

    /// Checks whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == ItemPatch::default()
    }
}

// =============================================================================
// Field Update
// =============================================================================

/// A single-field change, used by `Offer::bulk_update_field`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldUpdate {
    Price(f64),
    Discount(f64),
    PricePerBottle(f64),
    Margin(f64),
    Gross(f64),
    CustomerPrice(f64),
    Unit(String),
    Quantity(u32),
    VatRate(f64),
    GlassPrice(f64),
    Tags(Vec<String>),
    AvailableUnits(Vec<String>),
}

impl FieldUpdate {
    /// camelCase name of the field this update touches.
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldUpdate::Price(_) => "price",
            FieldUpdate::Discount(_) => "discount",
            FieldUpdate::PricePerBottle(_) => "pricePerBottle",
            FieldUpdate::Margin(_) => "margin",
            FieldUpdate::Gross(_) => "gross",
            FieldUpdate::CustomerPrice(_) => "customerPrice",
            FieldUpdate::Unit(_) => "unit",
            FieldUpdate::Quantity(_) => "quantity",
            FieldUpdate::VatRate(_) => "vatRate",
            FieldUpdate::GlassPrice(_) => "glassPrice",
            FieldUpdate::Tags(_) => "tags",
            FieldUpdate::AvailableUnits(_) => "availableUnits",
        }
    }
}

impl From<FieldUpdate> for ItemPatch {
    fn from(update: FieldUpdate) -> Self {
        let mut patch = ItemPatch::default();
        match update {
            FieldUpdate::Price(v) => patch.price = Some(v),
            FieldUpdate::Discount(v) => patch.discount = Some(v),
            FieldUpdate::PricePerBottle(v) => patch.price_per_bottle = Some(v),
            FieldUpdate::Margin(v) => patch.margin = Some(v),
            FieldUpdate::Gross(v) => patch.gross = Some(v),
            FieldUpdate::CustomerPrice(v) => patch.customer_price = Some(v),
            FieldUpdate::Unit(v) => patch.unit = Some(v),
            FieldUpdate::Quantity(v) => patch.quantity = Some(v),
            FieldUpdate::VatRate(v) => patch.vat_rate = Some(v),
            FieldUpdate::GlassPrice(v) => patch.glass_price = Some(v),
            FieldUpdate::Tags(v) => patch.tags = Some(v),
            FieldUpdate::AvailableUnits(v) => patch.available_units = Some(v),
        }
        patch
    }
}

// =============================================================================
// Item Selection
// =============================================================================

/// Which items a bulk operation applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSelection {
    /// Every item in the offer.
    #[default]
    All,
    /// Only the items with these ids. Unknown ids are ignored.
    Ids(Vec<String>),
}

impl ItemSelection {
    /// Builds an id selection from anything string-like.
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ItemSelection::Ids(ids.into_iter().map(Into::into).collect())
    }

    /// Checks whether an item id falls inside the selection.
    pub fn includes(&self, id: &str) -> bool {
        match self {
            ItemSelection::All => true,
            ItemSelection::Ids(ids) => ids.iter().any(|candidate| candidate == id),
        }
    }
}

// =============================================================================
// Offer Totals
// =============================================================================

/// Grand totals of an offer, each a rounded running sum over its items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OfferTotals {
    /// Σ pricePerUnit × quantity.
    pub total_net: f64,
    /// Σ vatAmount × quantity × unit multiplier.
    pub total_vat: f64,
    /// Σ customerPrice × unit multiplier × quantity.
    pub total_gross: f64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_config_json_is_camel_case() {
        let config: ItemConfig = serde_json::from_str(
            r#"{"price": 19.89, "pricePerBottle": 15.32, "vatRate": 24, "availableUnits": ["bottle"]}"#,
        )
        .unwrap();
        assert_eq!(config.price, Some(19.89));
        assert_eq!(config.price_per_bottle, Some(15.32));
        assert_eq!(config.vat_rate, Some(24.0));
        assert_eq!(config.available_units, Some(vec!["bottle".to_string()]));
        assert!(config.tags.is_empty());
    }

    #[test]
    fn test_quantity_must_be_whole_units() {
        assert!(serde_json::from_str::<ItemConfig>(r#"{"price": 10, "quantity": 1.5}"#).is_err());
        assert!(serde_json::from_str::<ItemConfig>(r#"{"price": 10, "quantity": -1}"#).is_err());

        let config: ItemConfig = serde_json::from_str(r#"{"price": 10, "quantity": 3}"#).unwrap();
        assert_eq!(config.quantity, Some(3));
    }

    #[test]
    fn test_item_config_omits_unset_fields() {
        let json = serde_json::to_value(ItemConfig::new(10.0)).unwrap();
        assert_eq!(json["price"], 10.0);
        assert!(json.get("margin").is_none());
        assert!(json.get("customerPrice").is_none());
    }

    #[test]
    fn test_patch_merge_only_overlays_set_fields() {
        let mut config = ItemConfig {
            price: Some(100.0),
            margin: Some(30.0),
            tags: vec!["red".to_string()],
            ..ItemConfig::default()
        };
        let patch = ItemPatch {
            quantity: Some(4),
            ..ItemPatch::default()
        };
        patch.merge_into(&mut config);

        assert_eq!(config.price, Some(100.0));
        assert_eq!(config.margin, Some(30.0));
        assert_eq!(config.quantity, Some(4));
        assert_eq!(config.tags, vec!["red".to_string()]);
    }

    #[test]
    fn test_field_update_into_patch() {
        let patch: ItemPatch = FieldUpdate::Margin(50.0).into();
        assert_eq!(patch.margin, Some(50.0));
        assert_eq!(FieldUpdate::Margin(50.0).field_name(), "margin");
        assert!(ItemPatch::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_selection_includes() {
        assert!(ItemSelection::All.includes("anything"));

        let only = ItemSelection::ids(["1", "3"]);
        assert!(only.includes("1"));
        assert!(!only.includes("2"));
    }
}
