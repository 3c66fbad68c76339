// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use semver::Version;

/// Name of the descriptor file looked up in a project directory.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "devchain.toml";

/// JSON flavour of the descriptor file, tried after the TOML one.
pub const JSON_CONFIG_FILE_NAME: &str = "devchain.json";

/// Name of the built-in, in-process simulated network.
pub const SIMULATED_NETWORK_NAME: &str = "hardhat";

/// Name of the loopback network profile written by `init`.
pub const LOCALHOST_NETWORK_NAME: &str = "localhost";

/// JSON-RPC endpoint of a development node running on this machine.
pub const DEFAULT_LOCALHOST_URL: &str = "http://127.0.0.1:8545";

/// Compiler version used by the default descriptor.
pub const DEFAULT_COMPILER_VERSION: Version = Version::new(0, 8, 11);

/// Optimizer runs used by the default descriptor.
pub const DEFAULT_OPTIMIZER_RUNS: u32 = 200;

/// Chain id of the simulated network when none is configured.
pub const DEFAULT_SIMULATED_CHAIN_ID: u64 = 31337;

/// Fee-market base fee of the simulated network's first block (1 gwei).
pub const DEFAULT_INITIAL_BASE_FEE_PER_GAS: u64 = 1_000_000_000;

/// Request timeout for JSON-RPC networks, in milliseconds.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 20_000;
