// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

//! The toolchain descriptor: which compilers to use and which networks exist.
//!
//! A descriptor is read once from `devchain.toml` (or `devchain.json`),
//! validated as a whole and then never mutated.

pub mod compiler;
pub mod network;
mod raw;

pub use compiler::{resolve_version, CompilerProfile, OptimizerSettings, SolidityConfig};
pub use network::{AccountKey, Endpoint, HttpNetwork, NetworkProfile, SimulatedNetwork};

use crate::{
    constants::{
        DEFAULT_COMPILER_VERSION, DEFAULT_CONFIG_FILE_NAME, DEFAULT_LOCALHOST_URL,
        DEFAULT_OPTIMIZER_RUNS, JSON_CONFIG_FILE_NAME, LOCALHOST_NETWORK_NAME,
        SIMULATED_NETWORK_NAME,
    },
    error::{ConfigError, Result, ValidationError},
};
use alloy_primitives::U256;
use raw::{RawConfig, RawSolidity};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    pub solidity: SolidityConfig,
    /// Unique by construction. Always contains the simulated network.
    pub networks: BTreeMap<String, NetworkProfile>,
    /// Network used when none is requested explicitly.
    pub default_network: String,
}

impl Default for ToolchainConfig {
    /// One optimized 0.8.11 compiler, the simulated network with a zero base
    /// fee and a node on localhost.
    fn default() -> Self {
        let compiler = CompilerProfile::new(
            DEFAULT_COMPILER_VERSION,
            OptimizerSettings {
                enabled: true,
                runs: DEFAULT_OPTIMIZER_RUNS,
            },
        );
        let localhost = Endpoint::parse(DEFAULT_LOCALHOST_URL).expect("default url is valid");

        let mut networks = BTreeMap::new();
        networks.insert(
            SIMULATED_NETWORK_NAME.to_string(),
            NetworkProfile::Simulated(SimulatedNetwork {
                initial_base_fee_per_gas: U256::ZERO,
                ..Default::default()
            }),
        );
        networks.insert(
            LOCALHOST_NETWORK_NAME.to_string(),
            NetworkProfile::Http(HttpNetwork::new(localhost)),
        );

        Self {
            solidity: SolidityConfig {
                compilers: vec![compiler],
                overrides: BTreeMap::new(),
            },
            networks,
            default_network: SIMULATED_NETWORK_NAME.to_string(),
        }
    }
}

impl ToolchainConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_raw(toml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::from_raw(serde_json::from_str(content)?)
    }

    /// Loads a descriptor, choosing the format by file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    /// Finds the descriptor file in `dir`, preferring TOML over JSON.
    pub fn find(dir: &Path) -> Result<PathBuf> {
        [DEFAULT_CONFIG_FILE_NAME, JSON_CONFIG_FILE_NAME]
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))
    }

    /// Finds and loads the descriptor in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        Self::load(&Self::find(dir)?)
    }

    /// Looks up a network profile by name.
    pub fn network(&self, name: &str) -> Result<&NetworkProfile> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork {
                name: name.to_string(),
                available: self.networks.keys().cloned().collect(),
            })
    }

    /// The profile named by `default_network`.
    pub fn default_network(&self) -> Result<&NetworkProfile> {
        self.network(&self.default_network)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&self.to_raw()?)?)
    }

    fn from_raw(raw: RawConfig) -> Result<Self> {
        let mut errors = vec![];

        let mut compilers = Vec::with_capacity(raw.solidity.compilers.len());
        if raw.solidity.compilers.is_empty() {
            errors.push(ValidationError::new(
                "solidity.compilers",
                "at least one compiler is required",
            ));
        }
        for (i, compiler) in raw.solidity.compilers.iter().enumerate() {
            let field = format!("solidity.compilers[{i}]");
            compilers.extend(CompilerProfile::from_raw(compiler, &field, &mut errors)?);
        }

        let mut overrides = BTreeMap::new();
        for (source, compiler) in &raw.solidity.overrides {
            let field = format!("solidity.overrides.{source}");
            if let Some(profile) = CompilerProfile::from_raw(compiler, &field, &mut errors)? {
                overrides.insert(source.clone(), profile);
            }
        }

        let mut networks = BTreeMap::new();
        for (name, network) in &raw.networks {
            if name.trim().is_empty() {
                errors.push(ValidationError::new("networks", "network names must not be empty"));
                continue;
            }
            if let Some(profile) = NetworkProfile::from_raw(name, network, &mut errors) {
                networks.insert(name.clone(), profile);
            }
        }
        networks
            .entry(SIMULATED_NETWORK_NAME.to_string())
            .or_insert_with(|| NetworkProfile::Simulated(SimulatedNetwork::default()));

        let default_network = raw
            .default_network
            .unwrap_or_else(|| SIMULATED_NETWORK_NAME.to_string());
        if !raw.networks.contains_key(&default_network) && default_network != SIMULATED_NETWORK_NAME
        {
            errors.push(ValidationError::new(
                "defaultNetwork",
                format!("'{default_network}' is not a configured network"),
            ));
        }

        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(Self {
            solidity: SolidityConfig {
                compilers,
                overrides,
            },
            networks,
            default_network,
        })
    }

    fn to_raw(&self) -> Result<RawConfig> {
        Ok(RawConfig {
            default_network: (self.default_network != SIMULATED_NETWORK_NAME)
                .then(|| self.default_network.clone()),
            solidity: RawSolidity {
                compilers: self.solidity.compilers.iter().map(CompilerProfile::to_raw).collect(),
                overrides: self
                    .solidity
                    .overrides
                    .iter()
                    .map(|(source, profile)| (source.clone(), profile.to_raw()))
                    .collect(),
            },
            networks: self
                .networks
                .iter()
                .map(|(name, profile)| Ok((name.clone(), profile.to_raw(name)?)))
                .collect::<Result<_>>()?,
        })
    }
}
