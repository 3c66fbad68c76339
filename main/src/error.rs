// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use std::path::PathBuf;

/// A single semantic problem found while validating a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending key, e.g. `networks.localhost.url`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A compiler version that cannot be mapped to a solc release.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("malformed compiler version '{version}': {source}")]
    Malformed {
        version: String,
        source: semver::Error,
    },

    #[error("compiler version '{version}' is not a known solc release")]
    Unsupported { version: String },
}

/// Errors produced while loading or querying a descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("unknown network '{name}' (available: {})", .available.join(", "))]
    UnknownNetwork { name: String, available: Vec<String> },

    #[error("no config file found in {0}")]
    NotFound(PathBuf),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("cannot write {field} = {value}: out of range for a config file integer")]
    Unrepresentable { field: String, value: String },
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_listed_together() {
        let err = ConfigError::Validation(vec![
            ValidationError::new("solidity.compilers", "at least one compiler is required"),
            ValidationError::new("networks.localhost.url", "missing"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid config: solidity.compilers: at least one compiler is required, \
             networks.localhost.url: missing"
        );
    }

    #[test]
    fn validation_error_names_its_field() {
        let err = ValidationError::new("networks.localhost.timeout", "must be positive");
        assert_eq!(err.to_string(), "networks.localhost.timeout: must be positive");
    }

    #[test]
    fn serialize_errors_keep_their_source() {
        let err = ConfigError::from(<toml::ser::Error as serde::ser::Error>::custom("bad value"));
        assert_eq!(err.to_string(), "failed to serialize config: bad value");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unknown_network_names_alternatives() {
        let err = ConfigError::UnknownNetwork {
            name: "mainnet".into(),
            available: vec!["hardhat".into(), "localhost".into()],
        };
        assert_eq!(
            err.to_string(),
            "unknown network 'mainnet' (available: hardhat, localhost)"
        );
    }
}
