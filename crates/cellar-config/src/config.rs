//! # Pricing Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CELLAR_VAT_RATE=24                                                 │
//! │     CELLAR_DEFAULT_UNIT=bottle                                         │
//! │     CELLAR_UNITS=crate_24=24,magnum_box=3                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config PATH, or                                                  │
//! │     ~/.config/cellar/pricing.toml (Linux)                              │
//! │     ~/Library/Application Support/com.cellar.cellar/pricing.toml (mac) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     25.5% VAT, bottle, built-in unit table                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! [defaults]
//! vat_rate = 25.5
//! unit = "bottle"
//!
//! # Merged over the built-in units; a listed built-in is replaced.
//! [units]
//! crate_24 = 24
//! pallet = 480
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cellar_core::rules::DEFAULT_VAT_RATE;
use cellar_core::units::DEFAULT_UNIT;
use cellar_core::{PricingRules, UnitTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "pricing.toml";

// =============================================================================
// Defaults Section
// =============================================================================

/// Values applied to item fields a config leaves out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// VAT percentage.
    #[serde(default = "default_vat_rate")]
    pub vat_rate: f64,

    /// Sale unit symbol.
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_vat_rate() -> f64 {
    DEFAULT_VAT_RATE
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            vat_rate: default_vat_rate(),
            unit: default_unit(),
        }
    }
}

// =============================================================================
// Pricing Config
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Extra or replacement units, merged over the built-ins.
    #[serde(default)]
    pub units: BTreeMap<String, u32>,
}

impl PricingConfig {
    /// Loads configuration from file and environment.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config file without applying environment overrides.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, self.to_toml_string()?)?;

        info!(?path, "Pricing config saved");
        Ok(path)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    ///
    /// ## Rules
    /// - Every unit symbol is a single token with a positive multiplier
    /// - The default VAT rate is finite and not negative
    /// - The default unit is a known unit
    pub fn validate(&self) -> ConfigResult<()> {
        self.to_rules().map(|_| ())
    }

    /// Builds the rules items are resolved under.
    pub fn to_rules(&self) -> ConfigResult<PricingRules> {
        let units = self
            .units
            .iter()
            .try_fold(UnitTable::default(), |table, (symbol, multiplier)| {
                table.with_unit(symbol, *multiplier)
            })?;

        if self.defaults.vat_rate < 0.0 {
            return Err(ConfigError::InvalidConfig(format!(
                "vat_rate must not be negative, got {}",
                self.defaults.vat_rate
            )));
        }

        if !units.contains(&self.defaults.unit) {
            return Err(ConfigError::InvalidConfig(format!(
                "default unit '{}' is not a known unit",
                self.defaults.unit
            )));
        }

        Ok(PricingRules::new(
            units,
            self.defaults.vat_rate,
            self.defaults.unit.clone(),
        )?)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the process environment in
    /// production, a map in tests).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("CELLAR_VAT_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(parsed) => {
                    debug!(vat_rate = parsed, "Overriding VAT rate from environment");
                    self.defaults.vat_rate = parsed;
                }
                Err(_) => warn!(value = %rate, "Ignoring unparsable CELLAR_VAT_RATE"),
            }
        }

        if let Some(unit) = lookup("CELLAR_DEFAULT_UNIT") {
            debug!(unit = %unit, "Overriding default unit from environment");
            self.defaults.unit = unit.trim().to_string();
        }

        if let Some(units) = lookup("CELLAR_UNITS") {
            match parse_unit_list(&units) {
                Ok(parsed) => {
                    debug!(count = parsed.len(), "Adding units from environment");
                    self.units.extend(parsed);
                }
                Err(e) => warn!(error = %e, "Ignoring CELLAR_UNITS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cellar", "cellar")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

/// Parses `sym=mult,sym=mult`.
pub fn parse_unit_list(list: &str) -> ConfigResult<BTreeMap<String, u32>> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (symbol, multiplier) = entry.split_once('=').ok_or_else(|| {
                ConfigError::InvalidConfig(format!("expected sym=mult, got '{}'", entry))
            })?;
            let multiplier = multiplier.trim().parse::<u32>().map_err(|_| {
                ConfigError::InvalidConfig(format!(
                    "multiplier for '{}' must be a whole number, got '{}'",
                    symbol.trim(),
                    multiplier.trim()
                ))
            })?;
            Ok((symbol.trim().to_string(), multiplier))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PricingConfig::default();
        assert_eq!(config.defaults.vat_rate, 25.5);
        assert_eq!(config.defaults.unit, "bottle");
        assert!(config.units.is_empty());
        assert!(config.validate().is_ok());
        assert_eq!(config.to_rules().unwrap(), PricingRules::default());
    }

    #[test]
    fn test_parse_toml() {
        let config = PricingConfig::from_toml_str(
            r#"
            [defaults]
            vat_rate = 14.0
            unit = "case_6"

            [units]
            crate_24 = 24
            pallet = 480
            "#,
        )
        .unwrap();

        let rules = config.to_rules().unwrap();
        assert_eq!(rules.default_vat_rate(), 14.0);
        assert_eq!(rules.default_unit(), "case_6");
        assert_eq!(rules.multiplier("crate_24"), 24);
        assert_eq!(rules.multiplier("pallet"), 480);
        assert_eq!(rules.multiplier("case_12"), 12);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PricingConfig::from_toml_str("[units]\nbox_3 = 3\n").unwrap();
        assert_eq!(config.defaults, DefaultsConfig::default());
        assert_eq!(config.units.get("box_3"), Some(&3));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            PricingConfig::from_toml_str("[defaults]\nvat_rate = \"high\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = PricingConfig::default();
        config.units.insert("broken".to_string(), 0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let mut config = PricingConfig::default();
        config.defaults.unit = "hogshead".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfig(_))));

        let mut config = PricingConfig::default();
        config.defaults.vat_rate = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = PricingConfig::default();
        config.apply_overrides(lookup(&[
            ("CELLAR_VAT_RATE", "24"),
            ("CELLAR_DEFAULT_UNIT", "case_12"),
            ("CELLAR_UNITS", "crate_24=24, box_3=3"),
        ]));

        assert_eq!(config.defaults.vat_rate, 24.0);
        assert_eq!(config.defaults.unit, "case_12");
        assert_eq!(config.units.get("crate_24"), Some(&24));
        assert_eq!(config.units.get("box_3"), Some(&3));
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = PricingConfig::default();
        config.apply_overrides(lookup(&[
            ("CELLAR_VAT_RATE", "lots"),
            ("CELLAR_UNITS", "crate_24"),
        ]));

        assert_eq!(config, PricingConfig::default());
    }

    #[test]
    fn test_parse_unit_list() {
        let units = parse_unit_list("a=1, b = 2,,").unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units.get("b"), Some(&2));

        assert!(parse_unit_list("a=x").is_err());
        assert!(parse_unit_list("a").is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = PricingConfig::default();
        config.units.insert("crate_24".to_string(), 24);

        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[defaults]"));
        assert!(toml_str.contains("[units]"));
        assert_eq!(PricingConfig::from_toml_str(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("cellar-config-test-does-not-exist.toml");
        let config = PricingConfig::load_or_default(Some(path));
        assert_eq!(config.defaults.unit, "bottle");
    }
}
