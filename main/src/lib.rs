// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

//! Toolchain descriptor for Solidity projects: compiler profiles and the
//! networks contracts can be tested against or deployed to.

pub mod config;
pub mod constants;
pub mod error;

pub use config::ToolchainConfig;
pub use error::{ConfigError, ResolutionError, ValidationError};
