//! # Unit Multipliers
//!
//! Maps a sale unit symbol (case, pallet, ...) to the number of base units
//! (bottles) it contains.
//!
//! ## Lookup Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  symbol ──► lowercase ──► table hit?  ── yes ──► multiplier             │
//! │                               │                                         │
//! │                               └── no ──► LookupMiss                     │
//! │                                            │                            │
//! │               resolving an item ◄──────────┤  multiplier 1, continue    │
//! │               Offer::set_unit   ◄──────────┘  whole call is a no-op     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::validation::{validate_multiplier, validate_unit_symbol, ValidationResult};

/// Base unit symbol used when a config does not name one.
pub const DEFAULT_UNIT: &str = "bottle";

/// Built-in unit symbols and their multipliers.
pub const BUILTIN_UNITS: &[(&str, u32)] = &[
    ("bottle", 1),
    ("single", 1),
    ("case", 6),
    ("case_6", 6),
    ("case_12", 12),
    ("pallet", 600),
];

/// Lookup table from unit symbol to integer multiplier.
///
/// Symbols are stored lowercase; lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitTable {
    units: BTreeMap<String, u32>,
}

impl UnitTable {
    /// Creates a table with no units at all.
    pub fn empty() -> Self {
        UnitTable {
            units: BTreeMap::new(),
        }
    }

    /// Returns a copy of this table extended with one more unit.
    ///
    /// Re-registering an existing symbol replaces its multiplier.
    ///
    /// ## Example
    /// ```rust
    /// use cellar_core::units::UnitTable;
    ///
    /// let table = UnitTable::default().with_unit("crate_24", 24).unwrap();
    /// assert_eq!(table.multiplier("CRATE_24"), 24);
    /// assert!(UnitTable::default().with_unit("broken", 0).is_err());
    /// ```
    pub fn with_unit(mut self, symbol: &str, multiplier: u32) -> ValidationResult<Self> {
        validate_unit_symbol(symbol)?;
        validate_multiplier(symbol, multiplier)?;
        self.units.insert(normalize(symbol), multiplier);
        Ok(self)
    }

    /// Returns the multiplier for a known symbol.
    pub fn lookup(&self, symbol: &str) -> Option<u32> {
        self.units.get(&normalize(symbol)).copied()
    }

    /// Returns the multiplier for a symbol, defaulting unknown symbols to 1.
    pub fn multiplier(&self, symbol: &str) -> u32 {
        match self.lookup(symbol) {
            Some(multiplier) => multiplier,
            None => {
                debug!(unit = %symbol, "Unknown unit symbol, using multiplier 1");
                1
            }
        }
    }

    /// Checks whether a symbol is registered.
    pub fn contains(&self, symbol: &str) -> bool {
        self.lookup(symbol).is_some()
    }

    /// Iterates over `(symbol, multiplier)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.units.iter().map(|(symbol, m)| (symbol.as_str(), *m))
    }

    /// Number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Default for UnitTable {
    /// The built-in units from [`BUILTIN_UNITS`].
    fn default() -> Self {
        UnitTable {
            units: BUILTIN_UNITS
                .iter()
                .map(|(symbol, m)| (symbol.to_string(), *m))
                .collect(),
        }
    }
}

/// Compares two unit symbols the way the table does.
pub fn same_unit(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

fn normalize(symbol: &str) -> String {
    symbol.trim().to_lowercase()
}

// =============================================================================
// Unit Tests
// =============================================================================
