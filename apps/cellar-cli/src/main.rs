//! # cellar
//!
//! Prices wine offers from sparse line item drafts.
//!
//! ```text
//! cellar [--config PATH] price <FILE|-> [--round-customer STEP] [--round-glass STEP] [--compact]
//! cellar [--config PATH] units
//! ```
//!
//! Priced offers are written to stdout as export JSON; logs go to stderr and
//! are filtered with `RUST_LOG`.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cellar_config::PricingConfig;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::{Price, Units};

/// Offer pricing tools
#[derive(Parser)]
#[command(name = "cellar")]
#[command(about = "Price wine offers from sparse line item drafts", long_about = None)]
#[command(version)]
struct Cli {
    /// Pricing config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Resolve an offer draft and print the priced export
    Price(Price),

    /// List the unit table in effect
    Units(Units),
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = PricingConfig::load(cli.config).context("Failed to load pricing config")?;
    let rules = Arc::new(config.to_rules()?);

    match cli.command {
        Command::Price(cmd) => cmd.execute(rules),
        Command::Units(cmd) => cmd.execute(&rules),
    }
}

/// Logs to stderr so stdout stays valid JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cellar=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
