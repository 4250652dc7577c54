//! Markup resolver: the {margin, gross, customerPrice} hierarchy.
//!
//! ## Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  customerPrice set?  ── yes ──► anchor = CustomerPrice                  │
//! │        │ no                     (a supplied gross is trusted as well)   │
//! │        ▼                                                                │
//! │  gross set?          ── yes ──► anchor = Gross                          │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  anchor = Margin (default 0%)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly one member anchors the result; the other two are derived from it
//! and the bottle price. A supplied margin is kept verbatim when something
//! else anchors (it is informational there).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::item::ledger::Origin;
use crate::money::round_money;

/// Which member of the markup group is authoritative for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum MarkupAnchor {
    CustomerPrice,
    Gross,
    Margin,
}

/// What the markup resolver needs from the rest of the item.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkupInput {
    pub price_per_bottle: f64,
    pub vat_rate: f64,
    pub margin: Option<f64>,
    pub gross: Option<f64>,
    pub customer_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Markup {
    pub margin: f64,
    pub gross: f64,
    pub vat_amount: f64,
    pub customer_price: f64,
    pub anchor: MarkupAnchor,
    pub gross_origin: Origin,
    pub customer_price_origin: Origin,
}

impl Markup {
    pub(crate) fn resolve(input: MarkupInput) -> Self {
        let gross_origin = Origin::of(&input.gross);
        let customer_price_origin = Origin::of(&input.customer_price);

        let (margin, gross, vat_amount, customer_price, anchor) =
            match (input.customer_price, input.gross) {
                (Some(customer_price), gross) => {
                    from_customer_price(&input, customer_price, gross)
                }
                (None, Some(gross)) => from_gross(&input, gross),
                (None, None) => from_margin(&input),
            };

        Markup {
            margin,
            gross,
            vat_amount,
            customer_price,
            anchor,
            gross_origin,
            customer_price_origin,
        }
    }
}

type Resolved = (f64, f64, f64, f64, MarkupAnchor);

fn from_customer_price(input: &MarkupInput, customer_price: f64, gross: Option<f64>) -> Resolved {
    let (gross, price_before_vat, vat_amount) = match gross {
        Some(gross) => {
            let price_before_vat = input.price_per_bottle + gross;
            (gross, price_before_vat, round_money(customer_price - price_before_vat))
        }
        None => {
            let price_before_vat = customer_price / (1.0 + input.vat_rate / 100.0);
            let vat_amount = round_money(customer_price - price_before_vat);
            let gross = round_money(price_before_vat - input.price_per_bottle);
            (gross, price_before_vat, vat_amount)
        }
    };

    let margin = input
        .margin
        .unwrap_or_else(|| derive_margin(gross, price_before_vat));

    (margin, gross, vat_amount, customer_price, MarkupAnchor::CustomerPrice)
}

fn from_gross(input: &MarkupInput, gross: f64) -> Resolved {
    let (vat_amount, customer_price, price_before_vat) = add_vat(input, gross);
    let margin = input
        .margin
        .unwrap_or_else(|| derive_margin(gross, price_before_vat));

    (margin, gross, vat_amount, customer_price, MarkupAnchor::Gross)
}

fn from_margin(input: &MarkupInput) -> Resolved {
    let margin = round_money(input.margin.unwrap_or(0.0));
    let remaining = 1.0 - margin / 100.0;

    // 100% margin would divide by zero
    let gross = if remaining == 0.0 {
        0.0
    } else {
        round_money(input.price_per_bottle / remaining - input.price_per_bottle)
    };

    let (vat_amount, customer_price, _) = add_vat(input, gross);
    (margin, gross, vat_amount, customer_price, MarkupAnchor::Margin)
}

/// Returns `(vat_amount, customer_price, price_before_vat)`.
fn add_vat(input: &MarkupInput, gross: f64) -> (f64, f64, f64) {
    let price_before_vat = input.price_per_bottle + gross;
    let vat_amount = round_money(price_before_vat * (input.vat_rate / 100.0));
    let customer_price = round_money(price_before_vat + vat_amount);
    (vat_amount, customer_price, price_before_vat)
}

fn derive_margin(gross: f64, price_before_vat: f64) -> f64 {
    if price_before_vat == 0.0 {
        return 0.0;
    }
    round_money(gross / price_before_vat * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(price_per_bottle: f64, vat_rate: f64) -> MarkupInput {
        MarkupInput {
            price_per_bottle,
            vat_rate,
            margin: None,
            gross: None,
            customer_price: None,
        }
    }

    #[test]
    fn test_margin_anchor() {
        let markup = Markup::resolve(MarkupInput {
            margin: Some(70.0),
            ..input(34.99, 25.5)
        });
        assert_eq!(markup.anchor, MarkupAnchor::Margin);
        assert_eq!(markup.gross, 81.64);
        assert_eq!(markup.vat_amount, 29.74);
        assert_eq!(markup.customer_price, 146.37);
        assert_eq!(markup.gross_origin, Origin::Derived);
    }

    #[test]
    fn test_full_margin_pins_gross_to_zero() {
        let markup = Markup::resolve(MarkupInput {
            margin: Some(100.0),
            ..input(100.0, 0.0)
        });
        assert_eq!(markup.gross, 0.0);
        assert_eq!(markup.customer_price, 100.0);
        assert_eq!(markup.margin, 100.0);
    }

    #[test]
    fn test_gross_anchor_derives_margin() {
        let markup = Markup::resolve(MarkupInput {
            gross: Some(100.0),
            ..input(41.75, 25.5)
        });
        assert_eq!(markup.anchor, MarkupAnchor::Gross);
        assert_eq!(markup.margin, 70.55);
        assert_eq!(markup.vat_amount, 36.15);
        assert_eq!(markup.customer_price, 177.9);
        assert_eq!(markup.gross_origin, Origin::Explicit);
    }

    #[test]
    fn test_gross_outranks_margin() {
        let markup = Markup::resolve(MarkupInput {
            margin: Some(10.0),
            gross: Some(50.0),
            ..input(100.0, 0.0)
        });
        assert_eq!(markup.gross, 50.0);
        assert_eq!(markup.customer_price, 150.0);
        assert_eq!(markup.margin, 10.0);
    }

    #[test]
    fn test_customer_price_anchor() {
        let markup = Markup::resolve(MarkupInput {
            customer_price: Some(200.0),
            ..input(100.0, 0.0)
        });
        assert_eq!(markup.anchor, MarkupAnchor::CustomerPrice);
        assert_eq!(markup.gross, 100.0);
        assert_eq!(markup.margin, 50.0);
        assert_eq!(markup.vat_amount, 0.0);
        assert_eq!(markup.customer_price_origin, Origin::Explicit);
    }

    #[test]
    fn test_customer_price_with_default_vat() {
        let markup = Markup::resolve(MarkupInput {
            customer_price: Some(200.0),
            ..input(100.0, 25.5)
        });
        assert_eq!(markup.vat_amount, 40.64);
        assert_eq!(markup.gross, 59.36);
        assert_eq!(markup.margin, 37.25);
    }

    #[test]
    fn test_customer_price_trusts_supplied_gross() {
        let markup = Markup::resolve(MarkupInput {
            customer_price: Some(150.0),
            gross: Some(40.0),
            ..input(100.0, 0.0)
        });
        assert_eq!(markup.gross, 40.0);
        assert_eq!(markup.vat_amount, 10.0);
        assert_eq!(markup.margin, 28.57);
        assert_eq!(markup.gross_origin, Origin::Explicit);
        assert_eq!(markup.customer_price_origin, Origin::Explicit);
    }

    #[test]
    fn test_zero_price_before_vat_has_zero_margin() {
        let markup = Markup::resolve(MarkupInput {
            gross: Some(0.0),
            ..input(0.0, 25.5)
        });
        assert_eq!(markup.margin, 0.0);
        assert_eq!(markup.customer_price, 0.0);
    }
}
