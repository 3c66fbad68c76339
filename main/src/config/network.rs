// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use super::raw::RawNetwork;
use crate::{
    constants::{
        DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_INITIAL_BASE_FEE_PER_GAS, DEFAULT_SIMULATED_CHAIN_ID,
        SIMULATED_NETWORK_NAME,
    },
    error::{ConfigError, ValidationError},
};
use alloy_primitives::{B256, U256};
use std::{fmt, time::Duration};
use url::Url;

const URL_SCHEMES: &[&str] = &["http", "https", "ws", "wss"];
const WS_SCHEMES: &[&str] = &["ws", "wss"];

/// A validated JSON-RPC endpoint that keeps the address exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    text: String,
    url: Url,
}

impl Endpoint {
    /// Parses an `http`, `https`, `ws` or `wss` address with a host.
    pub fn parse(text: &str) -> Result<Self, String> {
        let url = Url::parse(text).map_err(|e| format!("invalid url '{text}': {e}"))?;
        if !URL_SCHEMES.contains(&url.scheme()) {
            return Err(format!(
                "unsupported scheme '{}' in '{text}', expected one of {}",
                url.scheme(),
                URL_SCHEMES.join(", ")
            ));
        }
        if url.host_str().is_none() {
            return Err(format!("url '{text}' has no host"));
        }
        Ok(Self {
            text: text.to_string(),
            url,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether the node is spoken to over a websocket rather than plain HTTP.
    pub fn is_websocket(&self) -> bool {
        WS_SCHEMES.contains(&self.url.scheme())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A private key for a funded account on a JSON-RPC network.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AccountKey(B256);

impl AccountKey {
    /// Parses a 32-byte hex key, with or without a `0x` prefix.
    pub fn parse(key: &str) -> Result<Self, String> {
        let key = key.strip_prefix("0x").unwrap_or(key);
        let bytes = hex::decode(key).map_err(|e| format!("not valid hex: {e}"))?;
        if bytes.len() != 32 {
            return Err(format!("expected 32 bytes, got {}", bytes.len()));
        }
        Ok(Self(B256::from_slice(&bytes)))
    }

    pub fn secret(&self) -> &B256 {
        &self.0
    }
}

impl fmt::Debug for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccountKey(..)")
    }
}

/// The in-process simulated network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedNetwork {
    /// Base fee of the first block, replacing the fee-market default.
    pub initial_base_fee_per_gas: U256,
    pub chain_id: u64,
}

impl Default for SimulatedNetwork {
    fn default() -> Self {
        Self {
            initial_base_fee_per_gas: U256::from(DEFAULT_INITIAL_BASE_FEE_PER_GAS),
            chain_id: DEFAULT_SIMULATED_CHAIN_ID,
        }
    }
}

/// A node reachable over JSON-RPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpNetwork {
    pub url: Endpoint,
    /// When set, the node must report this chain id.
    pub chain_id: Option<u64>,
    pub accounts: Vec<AccountKey>,
    pub timeout: Duration,
}

impl HttpNetwork {
    pub fn new(url: Endpoint) -> Self {
        Self {
            url,
            chain_id: None,
            accounts: vec![],
            timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkProfile {
    Simulated(SimulatedNetwork),
    Http(HttpNetwork),
}

impl NetworkProfile {
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Self::Simulated(network) => Some(network.chain_id),
            Self::Http(network) => network.chain_id,
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, Self::Simulated(_))
    }

    /// Validates one `networks.<name>` entry, pushing every problem into `errors`.
    pub(crate) fn from_raw(
        name: &str,
        raw: &RawNetwork,
        errors: &mut Vec<ValidationError>,
    ) -> Option<Self> {
        let field = |key: &str| format!("networks.{name}.{key}");
        let before = errors.len();

        let chain_id = raw.chain_id.and_then(|id| match u64::try_from(id) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(ValidationError::new(
                    field("chainId"),
                    format!("must be a non-negative integer, got {id}"),
                ));
                None
            }
        });

        if name == SIMULATED_NETWORK_NAME {
            for (key, present) in [
                ("url", raw.url.is_some()),
                ("accounts", !raw.accounts.is_empty()),
                ("timeout", raw.timeout.is_some()),
            ] {
                if present {
                    errors.push(ValidationError::new(
                        field(key),
                        "not supported by the simulated network",
                    ));
                }
            }
            let initial_base_fee_per_gas = match raw.initial_base_fee_per_gas {
                None => U256::from(DEFAULT_INITIAL_BASE_FEE_PER_GAS),
                Some(fee) => match u64::try_from(fee) {
                    Ok(fee) => U256::from(fee),
                    Err(_) => {
                        errors.push(ValidationError::new(
                            field("initialBaseFeePerGas"),
                            format!("must be a non-negative integer, got {fee}"),
                        ));
                        U256::ZERO
                    }
                },
            };
            return (errors.len() == before).then(|| {
                Self::Simulated(SimulatedNetwork {
                    initial_base_fee_per_gas,
                    chain_id: chain_id.unwrap_or(DEFAULT_SIMULATED_CHAIN_ID),
                })
            });
        }

        if raw.initial_base_fee_per_gas.is_some() {
            errors.push(ValidationError::new(
                field("initialBaseFeePerGas"),
                format!("only supported by the '{SIMULATED_NETWORK_NAME}' network"),
            ));
        }

        let url = match raw.url.as_deref() {
            None => {
                errors.push(ValidationError::new(field("url"), "missing"));
                None
            }
            Some(url) => match Endpoint::parse(url) {
                Ok(url) => Some(url),
                Err(message) => {
                    errors.push(ValidationError::new(field("url"), message));
                    None
                }
            },
        };

        let mut accounts = Vec::with_capacity(raw.accounts.len());
        for (i, key) in raw.accounts.iter().enumerate() {
            match AccountKey::parse(key) {
                Ok(key) => accounts.push(key),
                Err(message) => {
                    errors.push(ValidationError::new(format!("{}[{i}]", field("accounts")), message))
                }
            }
        }

        let timeout = match raw.timeout {
            None => Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
            Some(ms) if ms > 0 => Duration::from_millis(ms as u64),
            Some(ms) => {
                errors.push(ValidationError::new(
                    field("timeout"),
                    format!("must be a positive number of milliseconds, got {ms}"),
                ));
                Duration::ZERO
            }
        };

        let url = url?;
        (errors.len() == before).then(|| {
            Self::Http(HttpNetwork {
                url,
                chain_id,
                accounts,
                timeout,
            })
        })
    }

    /// Converts back to the file shape. Fails for values a config file
    /// integer cannot hold, so that the written file reloads to the same profile.
    pub(crate) fn to_raw(&self, name: &str) -> Result<RawNetwork, ConfigError> {
        let field = |key: &str| format!("networks.{name}.{key}");
        match self {
            Self::Simulated(network) => {
                let fee = network.initial_base_fee_per_gas;
                let fee = u64::try_from(fee)
                    .ok()
                    .and_then(|fee| i64::try_from(fee).ok())
                    .ok_or_else(|| unrepresentable(field("initialBaseFeePerGas"), fee))?;
                let chain_id = match network.chain_id {
                    DEFAULT_SIMULATED_CHAIN_ID => None,
                    id => Some(to_file_int(field("chainId"), id)?),
                };
                Ok(RawNetwork {
                    chain_id,
                    initial_base_fee_per_gas: Some(fee),
                    ..Default::default()
                })
            }
            Self::Http(network) => {
                let chain_id = network
                    .chain_id
                    .map(|id| to_file_int(field("chainId"), id))
                    .transpose()?;
                let timeout = match network.timeout {
                    t if t == Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS) => None,
                    t if t.is_zero() || t.subsec_nanos() % 1_000_000 != 0 => {
                        return Err(unrepresentable(field("timeout"), format!("{t:?}")));
                    }
                    t => Some(to_file_int(field("timeout"), t.as_millis())?),
                };
                Ok(RawNetwork {
                    url: Some(network.url.as_str().to_string()),
                    chain_id,
                    accounts: network
                        .accounts
                        .iter()
                        .map(|key| format!("0x{}", hex::encode(key.secret())))
                        .collect(),
                    timeout,
                    initial_base_fee_per_gas: None,
                })
            }
        }
    }
}

fn to_file_int<T>(field: String, value: T) -> Result<i64, ConfigError>
where
    T: Copy + fmt::Display + TryInto<i64>,
{
    value
        .try_into()
        .map_err(|_| unrepresentable(field, value))
}

fn unrepresentable(field: String, value: impl fmt::Display) -> ConfigError {
    ConfigError::Unrepresentable {
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn http(url: &str) -> RawNetwork {
        RawNetwork {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    #[test]
    fn simulated_network_takes_base_fee_override() {
        let raw = RawNetwork {
            initial_base_fee_per_gas: Some(0),
            ..Default::default()
        };
        let mut errors = vec![];
        let profile = NetworkProfile::from_raw("hardhat", &raw, &mut errors).unwrap();
        assert!(errors.is_empty());
        assert_eq!(
            profile,
            NetworkProfile::Simulated(SimulatedNetwork {
                initial_base_fee_per_gas: U256::ZERO,
                chain_id: 31337,
            })
        );
    }

    #[test]
    fn simulated_network_rejects_endpoint_keys() {
        let raw = RawNetwork {
            accounts: vec![KEY.into()],
            ..http("http://127.0.0.1:8545")
        };
        let mut errors = vec![];
        assert!(NetworkProfile::from_raw("hardhat", &raw, &mut errors).is_none());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["networks.hardhat.url", "networks.hardhat.accounts"]);
    }

    #[test]
    fn http_network_with_defaults() {
        let mut errors = vec![];
        let profile =
            NetworkProfile::from_raw("localhost", &http("http://127.0.0.1:8545"), &mut errors)
                .unwrap();
        let NetworkProfile::Http(network) = profile else {
            panic!("expected http network");
        };
        assert_eq!(network.url.as_str(), "http://127.0.0.1:8545");
        assert_eq!(network.url.url().as_str(), "http://127.0.0.1:8545/");
        assert!(!network.url.is_websocket());
        assert_eq!(network.chain_id, None);
        assert_eq!(network.timeout, Duration::from_secs(20));
    }

    #[test]
    fn http_network_collects_every_problem() {
        let raw = RawNetwork {
            url: Some("ftp://example.com".into()),
            chain_id: Some(-5),
            accounts: vec!["0x1234".into(), "zz".into()],
            timeout: Some(0),
            initial_base_fee_per_gas: Some(0),
        };
        let mut errors = vec![];
        assert!(NetworkProfile::from_raw("remote", &raw, &mut errors).is_none());
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "networks.remote.chainId",
                "networks.remote.initialBaseFeePerGas",
                "networks.remote.url",
                "networks.remote.accounts[0]",
                "networks.remote.accounts[1]",
                "networks.remote.timeout",
            ]
        );
    }

    #[test]
    fn http_network_requires_url() {
        let mut errors = vec![];
        assert!(NetworkProfile::from_raw("sepolia", &RawNetwork::default(), &mut errors).is_none());
        assert_eq!(errors, [ValidationError::new("networks.sepolia.url", "missing")]);
    }

    #[test]
    fn account_keys_are_not_printed() {
        let key = AccountKey::parse(KEY).unwrap();
        assert_eq!(format!("{key:?}"), "AccountKey(..)");
        assert_eq!(AccountKey::parse(&KEY[2..]).unwrap(), key);
    }

    #[test]
    fn endpoints_need_a_host() {
        assert!(Endpoint::parse("http://").is_err());
        assert!(Endpoint::parse("not a url").is_err());
        assert!(Endpoint::parse("wss://rpc.example.org/ws").is_ok());
    }

    #[test]
    fn websocket_endpoints_are_recognised() {
        assert!(Endpoint::parse("wss://rpc.example.org/ws").unwrap().is_websocket());
        assert!(Endpoint::parse("ws://127.0.0.1:8546").unwrap().is_websocket());
        assert!(!Endpoint::parse("https://rpc.example.org").unwrap().is_websocket());
    }

    #[test]
    fn oversized_values_are_not_written() {
        let network = NetworkProfile::Simulated(SimulatedNetwork {
            initial_base_fee_per_gas: U256::MAX,
            chain_id: 31337,
        });
        match network.to_raw("hardhat") {
            Err(ConfigError::Unrepresentable { field, .. }) => {
                assert_eq!(field, "networks.hardhat.initialBaseFeePerGas")
            }
            other => panic!("unexpected: {other:?}"),
        }

        let mut remote = HttpNetwork::new(Endpoint::parse("https://rpc.example.org").unwrap());
        remote.chain_id = Some(u64::MAX);
        assert!(matches!(
            NetworkProfile::Http(remote.clone()).to_raw("remote"),
            Err(ConfigError::Unrepresentable { .. })
        ));

        remote.chain_id = Some(i64::MAX as u64);
        remote.timeout = Duration::from_micros(1500);
        assert!(matches!(
            NetworkProfile::Http(remote.clone()).to_raw("remote"),
            Err(ConfigError::Unrepresentable { .. })
        ));

        remote.timeout = Duration::from_millis(1500);
        let raw = NetworkProfile::Http(remote.clone()).to_raw("remote").unwrap();
        assert_eq!(raw.chain_id, Some(i64::MAX));
        assert_eq!(raw.timeout, Some(1500));
        assert_eq!(raw.url.as_deref(), Some("https://rpc.example.org"));
    }
}
