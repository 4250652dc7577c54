//! # Offer Aggregate
//!
//! An immutable, ordered collection of line items with running totals.
//!
//! ## Snapshot Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Offer ──► Arc<OfferState> { id, title, items, menu, data, totals }     │
//! │                                                                         │
//! │  offer.set_margin(40, All)                                              │
//! │     │                                                                   │
//! │     ├── every selected item re-resolved ──► new Vec<LineItem>           │
//! │     ├── totals recomputed                                               │
//! │     └── new Arc<OfferState> ──► new Offer                               │
//! │                                                                         │
//! │  The receiver keeps pointing at the old state. Operations that change   │
//! │  nothing at all (unknown unit in set_unit) hand back the same Arc.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! Each total is a running sum rounded to cents after every item:
//! - `totalNet   += pricePerUnit × quantity`
//! - `totalVat   += vatAmount × quantity × multiplier`
//! - `totalGross += customerPrice × multiplier × quantity`
//!
//! `totalGross` is the VAT-inclusive amount the customer pays; it is not
//! `totalNet + totalVat` because the markup sits between the two.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult};
use crate::item::{LineItem, LineItemExport};
use crate::money::round_money;
use crate::rules::PricingRules;
use crate::types::{FieldUpdate, ItemConfig, ItemData, ItemPatch, ItemSelection, OfferTotals};
use crate::units::same_unit;

// =============================================================================
// Offer Config
// =============================================================================

/// Construction input for an offer.
#[derive(Debug, Clone, Default)]
pub struct OfferConfig {
    /// Generated (UUID v4) when absent or empty.
    pub id: Option<String>,
    /// Empty when absent.
    pub title: Option<String>,
    pub items: Vec<LineItem>,
    pub menu: Option<Value>,
    pub data: ItemData,
}

// =============================================================================
// Offer
// =============================================================================

#[derive(Debug, PartialEq)]
struct OfferState {
    id: String,
    title: String,
    items: Vec<LineItem>,
    menu: Option<Value>,
    data: ItemData,
    totals: OfferTotals,
    rules: Arc<PricingRules>,
}

/// Immutable offer snapshot.
///
/// Cloning is cheap (one `Arc` bump). Serializes as [`OfferExport`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "OfferExport", try_from = "OfferExport")]
pub struct Offer {
    state: Arc<OfferState>,
}

impl PartialEq for Offer {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state) || self.state == other.state
    }
}

impl Offer {
    /// Builds an offer under the default rules.
    pub fn new(config: OfferConfig) -> Self {
        Self::with_rules(config, PricingRules::shared_default())
    }

    /// Builds an offer whose added and swapped items resolve under `rules`.
    ///
    /// Items already in `config` keep the rules they were resolved with.
    pub fn with_rules(config: OfferConfig, rules: Arc<PricingRules>) -> Self {
        let id = config
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(crate::generate_id);
        let totals = calculate_totals(&config.items);

        Offer {
            state: Arc::new(OfferState {
                id,
                title: config.title.unwrap_or_default(),
                items: config.items,
                menu: config.menu,
                data: config.data,
                totals,
                rules,
            }),
        }
    }

    /// Checks whether two offers are the very same snapshot.
    pub fn ptr_eq(a: &Offer, b: &Offer) -> bool {
        Arc::ptr_eq(&a.state, &b.state)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.state.id
    }

    pub fn title(&self) -> &str {
        &self.state.title
    }

    pub fn items(&self) -> &[LineItem] {
        &self.state.items
    }

    pub fn menu(&self) -> Option<&Value> {
        self.state.menu.as_ref()
    }

    pub fn data(&self) -> &ItemData {
        &self.state.data
    }

    pub fn totals(&self) -> OfferTotals {
        self.state.totals
    }

    pub fn rules(&self) -> &Arc<PricingRules> {
        &self.state.rules
    }

    /// First item with the given id.
    pub fn item(&self, id: &str) -> Option<&LineItem> {
        self.state.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.state.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.items.is_empty()
    }

    /// Sum of item quantities, in sale units.
    pub fn total_quantity(&self) -> u64 {
        self.state
            .items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Sum of quantity × multiplier, in base units.
    pub fn total_units(&self) -> u64 {
        self.state.items.iter().map(LineItem::total_units).sum()
    }

    // =========================================================================
    // Item Collection
    // =========================================================================

    /// Appends items resolved from `configs` under the offer's rules.
    ///
    /// Fails without changing anything if any config is invalid.
    pub fn add_items<I>(&self, configs: I) -> PricingResult<Offer>
    where
        I: IntoIterator<Item = ItemConfig>,
    {
        let added = configs
            .into_iter()
            .map(|config| LineItem::resolve_with(config, Arc::clone(&self.state.rules)))
            .collect::<PricingResult<Vec<_>>>()?;

        debug!(offer_id = %self.id(), count = added.len(), "Adding items");

        let mut items = self.state.items.clone();
        items.extend(added);
        Ok(self.with_items(items))
    }

    /// Drops every item whose id is listed. Unknown ids are ignored.
    pub fn remove_items<S: AsRef<str>>(&self, ids: &[S]) -> Offer {
        let items = self
            .state
            .items
            .iter()
            .filter(|item| !ids.iter().any(|id| id.as_ref() == item.id()))
            .cloned()
            .collect();
        self.with_items(items)
    }

    /// Applies a patch to the item with `id`. Unknown ids are a no-op.
    pub fn update_item(&self, id: &str, patch: &ItemPatch) -> PricingResult<Offer> {
        self.update_item_with(id, |item| item.update(patch))
    }

    /// Replaces the item with `id` by whatever `transform` returns.
    pub fn update_item_with<F>(&self, id: &str, transform: F) -> PricingResult<Offer>
    where
        F: FnOnce(&LineItem) -> PricingResult<LineItem>,
    {
        let Some(index) = self.state.items.iter().position(|item| item.id() == id) else {
            debug!(offer_id = %self.id(), item_id = %id, "No item to update");
            return Ok(self.clone());
        };

        let replacement = transform(&self.state.items[index])?;
        let mut items = self.state.items.clone();
        items[index] = replacement;
        Ok(self.with_items(items))
    }

    /// Replaces the item with `old_id` by a freshly resolved one, in place.
    ///
    /// The new item keeps nothing from the old one; its id comes from
    /// `config` (or is generated).
    pub fn swap_item(&self, old_id: &str, config: ItemConfig) -> PricingResult<Offer> {
        self.update_item_with(old_id, |_| {
            LineItem::resolve_with(config, Arc::clone(&self.state.rules))
        })
    }

    // =========================================================================
    // Bulk Updates
    // =========================================================================

    /// Applies one field change to every selected item.
    ///
    /// Fails as a whole if any selected item rejects the change.
    pub fn bulk_update_field(
        &self,
        selection: &ItemSelection,
        update: FieldUpdate,
    ) -> PricingResult<Offer> {
        debug!(offer_id = %self.id(), field = update.field_name(), "Bulk field update");
        let patch = ItemPatch::from(update);
        self.map_selected(selection, |item| item.update(&patch))
    }

    pub fn set_margin(&self, margin: f64, selection: &ItemSelection) -> PricingResult<Offer> {
        self.bulk_update_field(selection, FieldUpdate::Margin(margin))
    }

    pub fn set_gross(&self, gross: f64, selection: &ItemSelection) -> PricingResult<Offer> {
        self.bulk_update_field(selection, FieldUpdate::Gross(gross))
    }

    pub fn set_discount(&self, discount: f64, selection: &ItemSelection) -> PricingResult<Offer> {
        self.bulk_update_field(selection, FieldUpdate::Discount(discount))
    }

    pub fn set_quantity(&self, quantity: u32, selection: &ItemSelection) -> PricingResult<Offer> {
        self.bulk_update_field(selection, FieldUpdate::Quantity(quantity))
    }

    pub fn set_vat_rate(&self, vat_rate: f64, selection: &ItemSelection) -> PricingResult<Offer> {
        self.bulk_update_field(selection, FieldUpdate::VatRate(vat_rate))
    }

    pub fn set_glass_price(
        &self,
        glass_price: f64,
        selection: &ItemSelection,
    ) -> PricingResult<Offer> {
        self.bulk_update_field(selection, FieldUpdate::GlassPrice(glass_price))
    }

    /// Snaps the customer price of every selected item to `step`.
    pub fn round_customer_prices(
        &self,
        step: f64,
        selection: &ItemSelection,
    ) -> PricingResult<Offer> {
        self.map_selected(selection, |item| item.round_customer_price(step))
    }

    /// Snaps the glass price of every selected item to `step`.
    pub fn round_glass_prices(&self, step: f64, selection: &ItemSelection) -> PricingResult<Offer> {
        self.map_selected(selection, |item| item.round_glass_price(step))
    }

    /// Switches selected items to `unit`.
    ///
    /// Only items whose allow-list contains the unit, and whose own rules
    /// know it, are changed. A unit the offer's rules do not know returns
    /// this very offer.
    pub fn set_unit(&self, unit: &str, selection: &ItemSelection) -> PricingResult<Offer> {
        if !self.state.rules.units().contains(unit) {
            warn!(offer_id = %self.id(), unit = %unit, "Unknown unit, offer left unchanged");
            return Ok(self.clone());
        }

        let patch = ItemPatch {
            unit: Some(unit.to_string()),
            ..ItemPatch::default()
        };

        self.map_selected(selection, |item| {
            let allowed = item
                .available_units()
                .iter()
                .any(|candidate| same_unit(candidate, unit));
            if !allowed {
                return Ok(item.clone());
            }
            if !item.rules().units().contains(unit) {
                debug!(item_id = %item.id(), unit = %unit, "Unit unknown to item rules, skipped");
                return Ok(item.clone());
            }
            item.update(&patch)
        })
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn update_title(&self, title: impl Into<String>) -> Offer {
        self.with_state(|state| state.title = title.into())
    }

    pub fn set_menu(&self, menu: Option<Value>) -> Offer {
        self.with_state(|state| state.menu = menu)
    }

    pub fn set_data(&self, data: ItemData) -> Offer {
        self.with_state(|state| state.data = data)
    }

    // =========================================================================
    // JSON
    // =========================================================================

    /// Serializes the offer export.
    pub fn to_json(&self) -> PricingResult<String> {
        serde_json::to_string(self).map_err(|e| PricingError::invalid_export(e.to_string()))
    }

    /// Imports an offer export, re-resolving every item under `rules`.
    pub fn from_json(json: &str, rules: Arc<PricingRules>) -> PricingResult<Offer> {
        let export: OfferExport =
            serde_json::from_str(json).map_err(|e| PricingError::invalid_export(e.to_string()))?;
        Offer::from_export(export, rules)
    }

    /// Rebuilds an offer from its export. Stored totals are recomputed.
    pub fn from_export(export: OfferExport, rules: Arc<PricingRules>) -> PricingResult<Offer> {
        let items = export
            .items
            .into_iter()
            .map(|item| item.resolve_with(Arc::clone(&rules)))
            .collect::<PricingResult<Vec<_>>>()?;

        let offer = Offer::with_rules(
            OfferConfig {
                id: Some(export.id),
                title: Some(export.title),
                items,
                menu: export.menu,
                data: export.data,
            },
            rules,
        );

        if let Some(stored) = export.totals {
            if stored != offer.totals() {
                warn!(
                    offer_id = %offer.id(),
                    ?stored,
                    recomputed = ?offer.totals(),
                    "Stored offer totals differ from recomputed totals"
                );
            }
        }

        info!(offer_id = %offer.id(), items = offer.len(), "Imported offer");
        Ok(offer)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    fn map_selected<F>(&self, selection: &ItemSelection, mut f: F) -> PricingResult<Offer>
    where
        F: FnMut(&LineItem) -> PricingResult<LineItem>,
    {
        let items = self
            .state
            .items
            .iter()
            .map(|item| {
                if selection.includes(item.id()) {
                    f(item)
                } else {
                    Ok(item.clone())
                }
            })
            .collect::<PricingResult<Vec<_>>>()?;
        Ok(self.with_items(items))
    }

    fn with_items(&self, items: Vec<LineItem>) -> Offer {
        let totals = calculate_totals(&items);
        self.with_state(|state| {
            state.items = items;
            state.totals = totals;
        })
    }

    fn with_state<F: FnOnce(&mut OfferState)>(&self, change: F) -> Offer {
        let mut state = OfferState {
            id: self.state.id.clone(),
            title: self.state.title.clone(),
            items: self.state.items.clone(),
            menu: self.state.menu.clone(),
            data: self.state.data.clone(),
            totals: self.state.totals,
            rules: Arc::clone(&self.state.rules),
        };
        change(&mut state);
        Offer {
            state: Arc::new(state),
        }
    }
}

/// Running totals, rounded to cents after each item.
fn calculate_totals(items: &[LineItem]) -> OfferTotals {
    items.iter().fold(OfferTotals::default(), |acc, item| {
        let quantity = f64::from(item.quantity());
        let multiplier = f64::from(item.unit_multiplier());

        OfferTotals {
            total_net: round_money(acc.total_net + item.price_per_unit() * quantity),
            total_vat: round_money(acc.total_vat + item.vat_amount() * quantity * multiplier),
            total_gross: round_money(acc.total_gross + item.customer_price() * multiplier * quantity),
        }
    })
}

// =============================================================================
// Export Shape
// =============================================================================

/// Serialized form of an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OfferExport {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    #[ts(type = "unknown")]
    pub menu: Option<Value>,
    pub items: Vec<LineItemExport>,
    /// Informational on import; totals are always recomputed.
    #[serde(default)]
    #[ts(optional)]
    pub totals: Option<OfferTotals>,
    #[serde(default)]
    pub data: ItemData,
}

impl From<Offer> for OfferExport {
    fn from(offer: Offer) -> Self {
        OfferExport {
            id: offer.id().to_string(),
            title: offer.title().to_string(),
            menu: offer.state.menu.clone(),
            items: offer.items().iter().map(LineItemExport::from).collect(),
            totals: Some(offer.totals()),
            data: offer.state.data.clone(),
        }
    }
}

impl TryFrom<OfferExport> for Offer {
    type Error = PricingError;

    fn try_from(export: OfferExport) -> Result<Self, Self::Error> {
        Offer::from_export(export, PricingRules::shared_default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::UnitTable;

    fn item(config: ItemConfig) -> LineItem {
        LineItem::resolve(config).unwrap()
    }

    fn two_item_offer() -> Offer {
        Offer::new(OfferConfig {
            id: Some("offer-1".to_string()),
            title: Some("Autumn list".to_string()),
            items: vec![
                item(ItemConfig {
                    vat_rate: Some(0.0),
                    ..ItemConfig::new(100.0).with_id("1")
                }),
                item(ItemConfig {
                    vat_rate: Some(0.0),
                    ..ItemConfig::new(50.0).with_id("2")
                }),
            ],
            ..OfferConfig::default()
        })
    }

    #[test]
    fn test_empty_offer() {
        let offer = Offer::new(OfferConfig::default());
        assert!(!offer.id().is_empty());
        assert_eq!(offer.title(), "");
        assert!(offer.is_empty());
        assert_eq!(offer.totals(), OfferTotals::default());
        assert_eq!(offer.menu(), None);
    }

    #[test]
    fn test_totals_with_vat() {
        let offer = Offer::new(OfferConfig {
            items: vec![
                item(ItemConfig {
                    vat_rate: Some(20.0),
                    ..ItemConfig::new(100.0)
                }),
                item(ItemConfig {
                    vat_rate: Some(20.0),
                    ..ItemConfig::new(100.0)
                }),
            ],
            ..OfferConfig::default()
        });

        assert_eq!(
            offer.totals(),
            OfferTotals {
                total_net: 200.0,
                total_vat: 40.0,
                total_gross: 240.0,
            }
        );
    }

    #[test]
    fn test_totals_with_mixed_vat_rates() {
        let offer = Offer::new(OfferConfig {
            items: vec![
                item(ItemConfig {
                    vat_rate: Some(20.0),
                    ..ItemConfig::new(100.0)
                }),
                item(ItemConfig {
                    vat_rate: Some(10.0),
                    ..ItemConfig::new(100.0)
                }),
            ],
            ..OfferConfig::default()
        });

        let totals = offer.totals();
        assert_eq!(totals.total_net, 200.0);
        assert_eq!(totals.total_vat, 30.0);
        assert_eq!(totals.total_gross, 230.0);
    }

    #[test]
    fn test_totals_scale_with_unit_and_quantity() {
        let offer = Offer::new(OfferConfig {
            items: vec![item(ItemConfig {
                unit: Some("case_6".to_string()),
                quantity: Some(2),
                ..ItemConfig::new(10.0)
            })],
            ..OfferConfig::default()
        });

        let totals = offer.totals();
        assert_eq!(totals.total_net, 120.0);
        assert_eq!(totals.total_vat, 30.6);
        assert_eq!(totals.total_gross, 150.6);
        assert_eq!(offer.total_quantity(), 2);
        assert_eq!(offer.total_units(), 12);
    }

    #[test]
    fn test_operations_do_not_touch_receiver() {
        let offer = two_item_offer();
        let updated = offer.set_margin(50.0, &ItemSelection::All).unwrap();

        assert_eq!(offer.items()[0].margin(), 0.0);
        assert_eq!(offer.totals().total_gross, 150.0);
        assert_eq!(updated.items()[0].margin(), 50.0);
        assert_eq!(updated.totals().total_gross, 300.0);
        assert!(!Offer::ptr_eq(&offer, &updated));
    }

    #[test]
    fn test_add_items() {
        let offer = two_item_offer();
        let updated = offer
            .add_items(vec![ItemConfig {
                vat_rate: Some(0.0),
                ..ItemConfig::new(25.0).with_id("3")
            }])
            .unwrap();

        assert_eq!(offer.len(), 2);
        assert_eq!(updated.len(), 3);
        assert_eq!(updated.items()[2].id(), "3");
        assert_eq!(updated.totals().total_net, 175.0);
    }

    #[test]
    fn test_add_items_is_all_or_nothing() {
        let offer = two_item_offer();
        let result = offer.add_items(vec![ItemConfig::new(10.0), ItemConfig::default()]);
        assert!(result.is_err());
        assert_eq!(offer.len(), 2);
    }

    #[test]
    fn test_remove_items() {
        let offer = two_item_offer();
        let updated = offer.remove_items(&["1", "missing"]);
        assert_eq!(updated.len(), 1);
        assert_eq!(updated.items()[0].id(), "2");
        assert_eq!(updated.totals().total_net, 50.0);
    }

    #[test]
    fn test_update_item() {
        let offer = two_item_offer();
        let updated = offer
            .update_item(
                "2",
                &ItemPatch {
                    quantity: Some(3),
                    ..ItemPatch::default()
                },
            )
            .unwrap();

        assert_eq!(updated.item("2").map(LineItem::quantity), Some(3));
        assert_eq!(updated.item("1").map(LineItem::quantity), Some(1));
        assert_eq!(updated.totals().total_net, 250.0);
    }

    #[test]
    fn test_update_item_with_transform() {
        let offer = two_item_offer();
        let updated = offer
            .update_item_with("1", |item| {
                item.update(&ItemPatch {
                    price: Some(item.price() + 50.0),
                    ..ItemPatch::default()
                })
            })
            .unwrap();
        assert_eq!(updated.item("1").map(LineItem::price), Some(150.0));
    }

    #[test]
    fn test_update_unknown_item_is_noop() {
        let offer = two_item_offer();
        let updated = offer
            .update_item("missing", &ItemPatch::default())
            .unwrap();
        assert_eq!(updated, offer);
    }

    #[test]
    fn test_swap_item_keeps_position() {
        let offer = two_item_offer();
        let updated = offer
            .swap_item(
                "1",
                ItemConfig {
                    vat_rate: Some(0.0),
                    ..ItemConfig::new(10.0).with_id("new")
                },
            )
            .unwrap();

        assert_eq!(updated.items()[0].id(), "new");
        assert_eq!(updated.items()[1].id(), "2");
        assert!(updated.item("1").is_none());
        assert_eq!(updated.totals().total_net, 60.0);
    }

    #[test]
    fn test_bulk_update_respects_selection() {
        let offer = two_item_offer();
        let updated = offer
            .set_discount(10.0, &ItemSelection::ids(["2"]))
            .unwrap();

        assert_eq!(updated.item("1").map(LineItem::discount), Some(0.0));
        assert_eq!(updated.item("2").map(LineItem::price_per_bottle), Some(45.0));
    }

    #[test]
    fn test_bulk_wrappers() {
        let offer = two_item_offer();
        let all = ItemSelection::All;

        let updated = offer.set_gross(10.0, &all).unwrap();
        assert!(updated.items().iter().all(|i| i.gross() == 10.0));

        let updated = offer.set_quantity(4, &all).unwrap();
        assert_eq!(updated.total_quantity(), 8);

        let updated = offer.set_vat_rate(10.0, &all).unwrap();
        assert_eq!(updated.totals().total_vat, 15.0);

        let updated = offer.set_glass_price(7.25, &all).unwrap();
        assert!(updated.items().iter().all(|i| i.glass_price() == Some(7.25)));
    }

    #[test]
    fn test_bulk_update_fails_as_a_whole() {
        let offer = two_item_offer();
        let result = offer.bulk_update_field(&ItemSelection::All, FieldUpdate::Price(f64::NAN));
        assert!(result.is_err());
    }

    #[test]
    fn test_round_customer_prices() {
        let offer = Offer::new(OfferConfig {
            items: vec![
                item(ItemConfig {
                    margin: Some(39.0),
                    vat_rate: Some(0.0),
                    ..ItemConfig::new(10.0).with_id("a")
                }),
                item(ItemConfig {
                    margin: Some(40.0),
                    vat_rate: Some(0.0),
                    ..ItemConfig::new(10.0).with_id("b")
                }),
            ],
            ..OfferConfig::default()
        });

        let rounded = offer.round_customer_prices(1.0, &ItemSelection::All).unwrap();
        assert_eq!(rounded.item("a").map(LineItem::customer_price), Some(16.0));
        assert_eq!(rounded.item("b").map(LineItem::customer_price), Some(17.0));
        assert_eq!(rounded.totals().total_gross, 33.0);

        let only_a = offer
            .round_customer_prices(1.0, &ItemSelection::ids(["a"]))
            .unwrap();
        assert_eq!(only_a.item("b").map(LineItem::customer_price), Some(16.67));
    }

    #[test]
    fn test_round_glass_prices() {
        let offer = Offer::new(OfferConfig {
            items: vec![
                item(ItemConfig {
                    glass_price: Some(12.34),
                    ..ItemConfig::new(10.0)
                }),
                item(ItemConfig::new(10.0)),
            ],
            ..OfferConfig::default()
        });

        let rounded = offer.round_glass_prices(0.5, &ItemSelection::All).unwrap();
        assert_eq!(rounded.items()[0].glass_price(), Some(12.5));
        assert_eq!(rounded.items()[1].glass_price(), None);
    }

    #[test]
    fn test_set_unit_respects_allow_list() {
        let offer = Offer::new(OfferConfig {
            items: vec![
                item(ItemConfig {
                    available_units: Some(vec!["bottle".to_string(), "case_6".to_string()]),
                    ..ItemConfig::new(10.0).with_id("flexible")
                }),
                item(ItemConfig::new(10.0).with_id("bottle-only")),
            ],
            ..OfferConfig::default()
        });

        let updated = offer.set_unit("case_6", &ItemSelection::All).unwrap();
        let flexible = updated.item("flexible").unwrap();
        assert_eq!(flexible.unit(), "case_6");
        assert_eq!(flexible.price_per_unit(), 60.0);
        assert_eq!(updated.item("bottle-only").map(LineItem::unit), Some("bottle"));
    }

    #[test]
    fn test_set_unit_skips_items_whose_rules_lack_the_unit() {
        let bottles_only = Arc::new(
            PricingRules::new(UnitTable::empty().with_unit("bottle", 1).unwrap(), 0.0, "bottle")
                .unwrap(),
        );
        let foreign = LineItem::resolve_with(
            ItemConfig {
                available_units: Some(vec!["bottle".to_string(), "case_6".to_string()]),
                ..ItemConfig::new(10.0).with_id("foreign")
            },
            bottles_only,
        )
        .unwrap();
        let offer = Offer::new(OfferConfig {
            items: vec![foreign.clone()],
            ..OfferConfig::default()
        });

        let updated = offer.set_unit("case_6", &ItemSelection::All).unwrap();
        let kept = updated.item("foreign").unwrap();
        assert_eq!(kept.unit(), "bottle");
        assert_eq!(kept, &foreign);
    }

    #[test]
    fn test_set_unknown_unit_returns_same_offer() {
        let offer = two_item_offer();
        let same = offer.set_unit("NON_EXISTENT", &ItemSelection::All).unwrap();
        assert!(Offer::ptr_eq(&offer, &same));
    }

    #[test]
    fn test_metadata_setters() {
        let offer = two_item_offer();

        let renamed = offer.update_title("Winter list");
        assert_eq!(renamed.title(), "Winter list");
        assert_eq!(offer.title(), "Autumn list");
        assert_eq!(renamed.id(), offer.id());

        let with_menu = offer.set_menu(Some(serde_json::json!({"courses": 3})));
        assert_eq!(with_menu.menu(), Some(&serde_json::json!({"courses": 3})));

        let mut data = ItemData::new();
        data.insert("customer".to_string(), serde_json::json!("Bistro"));
        assert_eq!(offer.set_data(data.clone()).data(), &data);
    }

    #[test]
    fn test_json_round_trip_recomputes_totals() {
        let offer = two_item_offer()
            .set_margin(40.0, &ItemSelection::ids(["1"]))
            .unwrap();

        let json = offer.to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Autumn list");
        assert_eq!(value["totals"]["totalNet"], 150.0);

        value["totals"]["totalNet"] = serde_json::json!(1.0);
        let imported =
            Offer::from_json(&value.to_string(), PricingRules::shared_default()).unwrap();
        assert_eq!(imported, offer);
        assert_eq!(imported.totals().total_net, 150.0);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let result = Offer::from_json("{not json", PricingRules::shared_default());
        assert!(matches!(result, Err(PricingError::InvalidExport { .. })));
    }
}
