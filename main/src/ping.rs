// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::{
    macros::*,
    util::color::{Color, GREY},
    PingConfig,
};
use cargo_devchain::config::{Endpoint, HttpNetwork, NetworkProfile};
use ethers::{
    providers::{Http, Middleware, Provider, Ws},
    types::U256,
};
use eyre::{bail, eyre, Result, WrapErr};

/// Connects to a configured network and checks that it reports the expected chain id.
pub async fn ping(cfg: &PingConfig) -> Result<()> {
    let (_, config) = cfg.common_cfg.load()?;
    let name = cfg
        .network
        .clone()
        .unwrap_or_else(|| config.default_network.clone());
    let profile = config.network(&name)?;

    match profile {
        NetworkProfile::Simulated(network) => {
            println!(
                "{GREY}network {} is simulated in-process, chain id {}",
                name.mint(),
                network.chain_id.to_string().lavender()
            );
        }
        NetworkProfile::Http(network) => {
            if cfg.common_cfg.verbose {
                greyln!(
                    "connecting to RPC over {}: {}",
                    Transport::of(&network.url),
                    network.url.as_str().lavender()
                );
            }
            let chain_id = remote_chain_id(network).await?;
            check_chain_id(network.chain_id, chain_id)?;
            println!(
                "{GREY}network {} is reachable, chain id {}",
                name.mint(),
                chain_id.to_string().lavender()
            );
        }
    }
    Ok(())
}

/// How the provider talks to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Http,
    Ws,
}

impl Transport {
    fn of(endpoint: &Endpoint) -> Self {
        if endpoint.is_websocket() {
            Self::Ws
        } else {
            Self::Http
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Ws => f.write_str("websocket"),
        }
    }
}

async fn remote_chain_id(network: &HttpNetwork) -> Result<u64> {
    let chain_id = tokio::time::timeout(network.timeout, query_chain_id(&network.url))
        .await
        .map_err(|_| eyre!("no response within {}ms", network.timeout.as_millis()))??;
    if chain_id > U256::from(u64::MAX) {
        bail!("chain id {chain_id} does not fit in 64 bits");
    }
    Ok(chain_id.as_u64())
}

async fn query_chain_id(endpoint: &Endpoint) -> Result<U256> {
    match Transport::of(endpoint) {
        Transport::Http => {
            let provider = Provider::<Http>::try_from(endpoint.as_str())
                .wrap_err("failed to create RPC provider")?;
            provider.get_chainid().await.wrap_err("failed to get chain id")
        }
        Transport::Ws => {
            let provider = Provider::<Ws>::connect(endpoint.as_str())
                .await
                .wrap_err("failed to open websocket")?;
            provider.get_chainid().await.wrap_err("failed to get chain id")
        }
    }
}

/// A node must report the configured chain id, if there is one.
fn check_chain_id(expected: Option<u64>, actual: u64) -> Result<()> {
    match expected {
        Some(expected) if expected != actual => {
            bail!("chain id mismatch: config says {expected}, node reports {actual}")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_follows_the_url_scheme() {
        let endpoint = |url: &str| Endpoint::parse(url).unwrap();
        assert_eq!(Transport::of(&endpoint("http://127.0.0.1:8545")), Transport::Http);
        assert_eq!(Transport::of(&endpoint("https://rpc.sepolia.org")), Transport::Http);
        assert_eq!(Transport::of(&endpoint("ws://127.0.0.1:8546")), Transport::Ws);
        assert_eq!(Transport::of(&endpoint("wss://rpc.example.org/ws")), Transport::Ws);
    }

    #[test]
    fn chain_id_must_match_when_configured() {
        assert!(check_chain_id(None, 1).is_ok());
        assert!(check_chain_id(Some(31337), 31337).is_ok());
        let err = check_chain_id(Some(1), 31337).unwrap_err();
        assert_eq!(
            err.to_string(),
            "chain id mismatch: config says 1, node reports 31337"
        );
    }
}
