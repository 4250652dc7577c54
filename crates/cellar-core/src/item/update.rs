//! Update engine: apply a patch to a resolved item.
//!
//! ## Authority Busting
//! ```text
//!   patch sets        clears before merge
//!   ──────────────    ─────────────────────────────────────
//!   price             pricePerBottle, gross, customerPrice
//!                     (margin is kept as the new anchor)
//!   discount          pricePerBottle
//!   pricePerBottle    discount
//!   margin            gross, customerPrice
//!   gross             customerPrice, margin
//!   customerPrice     margin, gross
//!   anything else     nothing
//! ```
//!
//! Clearing happens on the item's emitted config, then the patch is merged
//! over it, so a patch that sets two members of a group (e.g. discount and
//! pricePerBottle) keeps both.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::PricingResult;
use crate::item::LineItem;
use crate::money::snap_to_step;
use crate::types::{ItemConfig, ItemPatch};
use crate::validation::validate_step;

impl LineItem {
    /// Returns a new item with the patch applied.
    ///
    /// The receiver is never modified. Id, tags, data and the resolution
    /// rules carry over unless the patch replaces them.
    ///
    /// ## Example
    /// ```rust
    /// use cellar_core::{ItemConfig, ItemPatch, LineItem};
    ///
    /// let item = LineItem::resolve(ItemConfig {
    ///     margin: Some(70.0),
    ///     ..ItemConfig::new(41.75)
    /// }).unwrap();
    ///
    /// let updated = item.update(&ItemPatch {
    ///     gross: Some(100.0),
    ///     ..ItemPatch::default()
    /// }).unwrap();
    ///
    /// assert_eq!(updated.customer_price(), 177.9);
    /// assert_eq!(item.customer_price(), 174.66);
    /// ```
    pub fn update(&self, patch: &ItemPatch) -> PricingResult<LineItem> {
        let mut config = self.to_config();
        bust_authority(&mut config, patch);

        // A repriced item keeps its markup percentage even when the customer
        // price was the anchor.
        if patch.price.is_some() && config.margin.is_none() && !sets_markup(patch) {
            config.margin = Some(self.margin);
        }
        patch.merge_into(&mut config);

        trace!(item_id = %self.id, "Applying item patch");
        LineItem::resolve_with(config, Arc::clone(&self.rules))
    }

    /// Snaps the customer price to the nearest multiple of `step` and makes
    /// it authoritative.
    pub fn round_customer_price(&self, step: f64) -> PricingResult<LineItem> {
        let customer_price = snap_to_step(self.customer_price, step)?;
        debug!(
            item_id = %self.id,
            from = self.customer_price,
            to = customer_price,
            "Rounding customer price"
        );

        self.update(&ItemPatch {
            customer_price: Some(customer_price),
            ..ItemPatch::default()
        })
    }

    /// Snaps the glass price to the nearest multiple of `step`.
    ///
    /// An item without a glass price comes back unchanged.
    pub fn round_glass_price(&self, step: f64) -> PricingResult<LineItem> {
        validate_step("step", step)?;

        let Some(glass_price) = self.glass_price else {
            return Ok(self.clone());
        };

        self.update(&ItemPatch {
            glass_price: Some(snap_to_step(glass_price, step)?),
            ..ItemPatch::default()
        })
    }
}

fn sets_markup(patch: &ItemPatch) -> bool {
    patch.margin.is_some() || patch.gross.is_some() || patch.customer_price.is_some()
}

/// Clears config fields that would outrank the fields the patch sets.
fn bust_authority(config: &mut ItemConfig, patch: &ItemPatch) {
    if patch.price.is_some() {
        config.price_per_bottle = None;
        config.gross = None;
        config.customer_price = None;
    }
    if patch.discount.is_some() {
        config.price_per_bottle = None;
    }
    if patch.price_per_bottle.is_some() {
        config.discount = None;
    }
    if patch.margin.is_some() {
        config.gross = None;
        config.customer_price = None;
    }
    if patch.gross.is_some() {
        config.customer_price = None;
        config.margin = None;
    }
    if patch.customer_price.is_some() {
        config.margin = None;
        config.gross = None;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
