//! Base price resolver: the {discount, pricePerBottle} pair.
//!
//! ```text
//!   discount  pricePerBottle   outcome
//!   ────────  ──────────────   ─────────────────────────────────────────
//!   given     given            both trusted verbatim (dual trust)
//!   -         given            discount derived from the bottle price
//!   given/-   -                bottle price derived from the discount
//! ```
//!
//! Dual trust is what keeps a caller's 23% discount at exactly 23 after any
//! number of export/reconstruct cycles, even though the rounded bottle price
//! on its own would derive 22.98.

use crate::item::ledger::Origin;
use crate::money::round_money;

/// Resolved discount and discounted vendor price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BasePrice {
    pub discount: f64,
    pub price_per_bottle: f64,
    pub price_per_bottle_origin: Origin,
}

impl BasePrice {
    pub(crate) fn resolve(price: f64, discount: Option<f64>, price_per_bottle: Option<f64>) -> Self {
        match (discount, price_per_bottle) {
            (Some(discount), Some(price_per_bottle)) => BasePrice {
                discount,
                price_per_bottle,
                price_per_bottle_origin: Origin::Explicit,
            },
            (None, Some(price_per_bottle)) => BasePrice {
                discount: derive_discount(price, price_per_bottle),
                price_per_bottle,
                price_per_bottle_origin: Origin::Explicit,
            },
            (discount, None) => {
                let discount = round_money(discount.unwrap_or(0.0));
                BasePrice {
                    discount,
                    price_per_bottle: round_money(price * (1.0 - discount / 100.0)),
                    price_per_bottle_origin: Origin::Derived,
                }
            }
        }
    }
}

/// Discount implied by a bottle price. A free item (price 0) has no discount.
fn derive_discount(price: f64, price_per_bottle: f64) -> f64 {
    if price == 0.0 {
        return 0.0;
    }
    round_money((1.0 - price_per_bottle / price) * 100.0)
}
