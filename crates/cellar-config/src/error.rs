//! # Config Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Config Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │      File       │  │      TOML       │  │        Values           │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Io             │  │  Parse          │  │  InvalidConfig          │ │
//! │  │  NoConfigPath   │  │  Serialize      │  │  Validation             │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cellar_core::ValidationError;
use thiserror::Error;

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config could not be written as TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// No explicit path was given and the platform has no config directory.
    #[error("No config path available")]
    NoConfigPath,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid pricing value: {0}")]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::InvalidConfig("unit 'x' has no multiplier".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: unit 'x' has no multiplier"
        );

        let err: ConfigError = ValidationError::MustBePositive {
            field: "case multiplier".into(),
        }
        .into();
        assert!(err.to_string().starts_with("Invalid pricing value:"));
    }
}
