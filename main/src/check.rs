// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::{
    describe,
    macros::*,
    util::color::{Color, GREY},
    CheckConfig,
};
use cargo_devchain::{
    config::{CompilerProfile, NetworkProfile},
    ToolchainConfig,
};
use eyre::{Result, WrapErr};
use serde_json::{json, Value};

/// Checks that the toolchain config is well formed and prints what it declares.
pub fn check(cfg: &CheckConfig) -> Result<()> {
    let (path, config) = cfg.common_cfg.load()?;

    if cfg.json {
        let summary =
            serde_json::to_string_pretty(&summary(&config)).wrap_err("failed to encode summary")?;
        println!("{summary}");
        return Ok(());
    }

    greyln!("config file: {}", path.to_string_lossy().lavender());
    for (i, compiler) in config.solidity.compilers.iter().enumerate() {
        greyln!("compiler #{i}: {}", format_compiler(compiler));
    }
    for (source, compiler) in &config.solidity.overrides {
        greyln!("override for {}: {}", source.yellow(), format_compiler(compiler));
    }
    if cfg.common_cfg.verbose {
        let versions: Vec<String> = config
            .solidity
            .versions()
            .iter()
            .map(ToString::to_string)
            .collect();
        greyln!("compilers to install: {}", versions.join(", ").lavender());
    }

    for (name, profile) in &config.networks {
        greyln!("network {}: {}", name.mint(), describe(profile));
        if let NetworkProfile::Simulated(network) = profile {
            if cfg.common_cfg.verbose {
                greyln!(
                    "initial base fee: {} wei",
                    network.initial_base_fee_per_gas.to_string().lavender()
                );
            }
        }
    }
    println!("{GREY}default network: {}", config.default_network.mint());
    println!("{GREY}config is {}", "valid".mint());
    Ok(())
}

pub fn format_compiler(compiler: &CompilerProfile) -> String {
    let optimizer = if compiler.optimizer.enabled {
        format!("optimizer enabled ({} runs)", compiler.optimizer.runs)
    } else {
        "optimizer disabled".to_string()
    };
    format!("solc {} with {optimizer}", compiler.version)
}

/// Machine-readable view of the config. Account keys are reduced to a count.
pub fn summary(config: &ToolchainConfig) -> Value {
    let compiler = |profile: &CompilerProfile| {
        json!({
            "version": profile.version.to_string(),
            "settings": {
                "optimizer": {
                    "enabled": profile.optimizer.enabled,
                    "runs": profile.optimizer.runs,
                }
            }
        })
    };
    let networks: serde_json::Map<String, Value> = config
        .networks
        .iter()
        .map(|(name, profile)| {
            let value = match profile {
                NetworkProfile::Simulated(network) => json!({
                    "chainId": network.chain_id,
                    "initialBaseFeePerGas": network.initial_base_fee_per_gas.to_string(),
                }),
                NetworkProfile::Http(network) => json!({
                    "url": network.url.as_str(),
                    "chainId": network.chain_id,
                    "accounts": network.accounts.len(),
                    "timeout": u64::try_from(network.timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            };
            (name.clone(), value)
        })
        .collect();
    let overrides: serde_json::Map<String, Value> = config
        .solidity
        .overrides
        .iter()
        .map(|(source, profile)| (source.clone(), compiler(profile)))
        .collect();

    json!({
        "defaultNetwork": config.default_network,
        "solidity": {
            "compilers": config.solidity.compilers.iter().map(compiler).collect::<Vec<_>>(),
            "overrides": overrides,
        },
        "networks": networks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_default_config() {
        let summary = summary(&ToolchainConfig::default());
        assert_eq!(summary["defaultNetwork"], "hardhat");
        assert_eq!(summary["solidity"]["compilers"][0]["version"], "0.8.11");
        assert_eq!(
            summary["solidity"]["compilers"][0]["settings"]["optimizer"]["runs"],
            200
        );
        assert_eq!(summary["networks"]["hardhat"]["initialBaseFeePerGas"], "0");
        assert_eq!(summary["networks"]["hardhat"]["chainId"], 31337);
        assert_eq!(summary["networks"]["localhost"]["url"], "http://127.0.0.1:8545");
        assert_eq!(summary["networks"]["localhost"]["accounts"], 0);
    }

    #[test]
    fn compilers_are_formatted_with_optimizer_state() {
        let config = ToolchainConfig::default();
        assert_eq!(
            format_compiler(&config.solidity.compilers[0]),
            "solc 0.8.11 with optimizer enabled (200 runs)"
        );
    }
}
