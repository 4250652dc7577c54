//! Resolve an offer draft and print the priced export.
//!
//! A draft is a sparse offer: metadata plus a list of item configs.
//!
//! ```json
//! {
//!   "title": "Autumn list",
//!   "items": [
//!     { "price": 34.99, "margin": 70 },
//!     { "price": 19.89, "discount": 23, "unit": "case_6", "quantity": 2 }
//!   ]
//! }
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use cellar_core::{ItemConfig, ItemData, ItemSelection, Offer, OfferConfig, PricingRules};
use clap::Parser;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// Resolve an offer draft and print the priced export
#[derive(Parser)]
pub struct Price {
    /// Offer draft JSON file, or `-` for stdin
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Snap every customer price to a multiple of STEP
    #[arg(long, value_name = "STEP")]
    round_customer: Option<f64>,

    /// Snap every glass price to a multiple of STEP
    #[arg(long, value_name = "STEP")]
    round_glass: Option<f64>,

    /// Print single-line JSON
    #[arg(long)]
    compact: bool,
}

/// Sparse offer input.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferDraft {
    id: Option<String>,
    title: Option<String>,
    #[serde(default)]
    menu: Option<Value>,
    #[serde(default)]
    data: ItemData,
    #[serde(default)]
    items: Vec<ItemConfig>,
}

impl Price {
    pub fn execute(self, rules: Arc<PricingRules>) -> Result<()> {
        let source = read_input(&self.input)?;
        let draft: OfferDraft =
            serde_json::from_str(&source).context("Offer draft is not valid JSON")?;

        let offer = price_offer(draft, rules, self.round_customer, self.round_glass)?;

        let totals = offer.totals();
        info!(
            items = offer.len(),
            total_net = totals.total_net,
            total_vat = totals.total_vat,
            total_gross = totals.total_gross,
            "Priced offer"
        );

        let json = if self.compact {
            serde_json::to_string(&offer)?
        } else {
            serde_json::to_string_pretty(&offer)?
        };
        println!("{}", json);

        Ok(())
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read offer draft from stdin")?;
        return Ok(buffer);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read offer draft {}", path.display()))
}

fn price_offer(
    draft: OfferDraft,
    rules: Arc<PricingRules>,
    round_customer: Option<f64>,
    round_glass: Option<f64>,
) -> Result<Offer> {
    let mut offer = Offer::with_rules(
        OfferConfig {
            id: draft.id,
            title: draft.title,
            items: Vec::new(),
            menu: draft.menu,
            data: draft.data,
        },
        rules,
    )
    .add_items(draft.items)
    .context("Offer draft contains an invalid item")?;

    if let Some(step) = round_customer {
        offer = offer
            .round_customer_prices(step, &ItemSelection::All)
            .context("Failed to round customer prices")?;
    }
    if let Some(step) = round_glass {
        offer = offer
            .round_glass_prices(step, &ItemSelection::All)
            .context("Failed to round glass prices")?;
    }

    Ok(offer)
}
