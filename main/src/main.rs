// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use cargo_devchain::{config::NetworkProfile, constants::DEFAULT_CONFIG_FILE_NAME, ToolchainConfig};
use clap::{Args, Parser};
use eyre::{eyre, Context, Result};
use std::{
    env,
    path::{Path, PathBuf},
};
use macros::*;
use util::color::{Color, GREY};

mod check;
mod macros;
mod new;
mod ping;
mod util;

#[derive(Parser, Debug)]
#[command(name = "devchain")]
#[command(bin_name = "cargo devchain")]
#[command(author = "Offchain Labs, Inc.")]
#[command(about = "Cargo command for checking smart-contract toolchain configuration", long_about = None)]
#[command(propagate_version = true)]
#[command(version)]
struct Opts {
    #[command(subcommand)]
    command: Apis,
}

#[derive(Parser, Debug, Clone)]
enum Apis {
    /// Create a new directory holding a default toolchain config.
    #[command(alias = "n")]
    New { path: PathBuf },
    /// Write a default toolchain config into the current directory.
    #[command()]
    Init,
    /// Validate the toolchain config and summarize it.
    #[command(alias = "c")]
    Check(CheckConfig),
    /// List the configured networks.
    #[command()]
    Networks(CommonConfig),
    /// Connect to a network and confirm its chain id.
    #[command(alias = "p")]
    Ping(PingConfig),
}

#[derive(Args, Clone, Debug)]
pub struct CommonConfig {
    /// Path to the config file. Defaults to devchain.toml or devchain.json in the current directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl CommonConfig {
    /// Loads the descriptor, returning the file it came from.
    fn load(&self) -> Result<(PathBuf, ToolchainConfig)> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => {
                let dir = env::current_dir().wrap_err("no current dir")?;
                ToolchainConfig::find(&dir)?
            }
        };
        if self.verbose {
            greyln!("reading config at {}", path.to_string_lossy().lavender());
        }
        let config = ToolchainConfig::load(&path)
            .wrap_err_with(|| eyre!("failed to load {}", path.to_string_lossy()))?;
        Ok((path, config))
    }
}

#[derive(Args, Clone, Debug)]
pub struct CheckConfig {
    #[command(flatten)]
    common_cfg: CommonConfig,
    /// Print the validated config as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Clone, Debug)]
pub struct PingConfig {
    #[command(flatten)]
    common_cfg: CommonConfig,
    /// Network to connect to. Defaults to the config's default network.
    #[arg(short, long)]
    network: Option<String>,
}

fn main() -> Result<()> {
    // skip the starting arguments passed from the OS and/or cargo.
    let args: Vec<String> = env::args()
        .skip_while(|x| x == "cargo" || x.contains("cargo-devchain") || x == "devchain")
        .collect();

    if args.is_empty() {
        print_commands();
        return Ok(());
    }
    let opts = Opts::parse_from(std::iter::once("devchain".to_string()).chain(args));
    main_impl(opts)
}

fn print_commands() {
    greyln!("usage: cargo devchain <COMMAND>");
    greyln!("commands: new, init, check, networks, ping");
}

#[tokio::main]
async fn main_impl(args: Opts) -> Result<()> {
    macro_rules! run {
        ($expr:expr, $($msg:expr),+) => {
            $expr.wrap_err_with(|| eyre!($($msg),+))?
        };
    }

    match args.command {
        Apis::New { path } => {
            run!(new::new(&path), "failed to create new project config");
        }
        Apis::Init => {
            run!(new::init(), "failed to initialize project config");
        }
        Apis::Check(config) => {
            run!(check::check(&config), "config checks failed");
        }
        Apis::Networks(config) => {
            run!(list_networks(&config), "failed to list networks");
        }
        Apis::Ping(config) => {
            run!(ping::ping(&config).await, "failed to reach network");
        }
    }
    Ok(())
}

fn list_networks(cfg: &CommonConfig) -> Result<()> {
    let (_, config) = cfg.load()?;
    for (name, profile) in &config.networks {
        let marker = if *name == config.default_network { "*" } else { " " };
        println!("{GREY}{marker} {}: {}", name.mint(), describe(profile));
    }
    Ok(())
}

/// One-line description of where a network lives.
pub fn describe(profile: &NetworkProfile) -> String {
    match profile {
        NetworkProfile::Simulated(network) => {
            format!("simulated, chain id {}", network.chain_id)
        }
        NetworkProfile::Http(network) => match network.chain_id {
            Some(id) => format!("{} (chain id {id})", network.url),
            None => network.url.to_string(),
        },
    }
}

/// The file `init` and `new` write into `dir`.
pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(DEFAULT_CONFIG_FILE_NAME)
}
