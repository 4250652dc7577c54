//! List the unit table in effect.

use anyhow::Result;
use cellar_core::{PricingRules, UnitTable};
use clap::Parser;

/// List the unit table in effect
#[derive(Parser)]
pub struct Units {
    /// Print as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Units {
    pub fn execute(self, rules: &PricingRules) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(rules.units())?);
        } else {
            print!("{}", render_table(rules.units(), rules.default_unit()));
        }
        Ok(())
    }
}

fn render_table(units: &UnitTable, default_unit: &str) -> String {
    let width = units
        .iter()
        .map(|(symbol, _)| symbol.len())
        .max()
        .unwrap_or(0);

    units
        .iter()
        .map(|(symbol, multiplier)| {
            let marker = if cellar_core::units::same_unit(symbol, default_unit) {
                "  (default)"
            } else {
                ""
            };
            format!("{:<width$}  {:>4}{}\n", symbol, multiplier, marker, width = width)
        })
        .collect()
}
