// Copyright 2023-2024, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/cargo-stylus/blob/main/licenses/COPYRIGHT.md

use crate::{config_path, util::color::{Color, GREY}};
use cargo_devchain::ToolchainConfig;
use eyre::{bail, Context, Result};
use std::{env, fs, path::Path};

/// Creates a new directory given the path and then writes a default config into it.
pub fn new(path: &Path) -> Result<()> {
    fs::create_dir_all(path).wrap_err("failed to create project dir")?;
    write_default(path)
}

/// Writes a default config into the current directory.
pub fn init() -> Result<()> {
    let current_dir = env::current_dir().wrap_err("no current dir")?;
    write_default(&current_dir)
}

fn write_default(dir: &Path) -> Result<()> {
    let path = config_path(dir);
    if path.exists() {
        bail!("{} already exists", path.to_string_lossy());
    }
    let contents = ToolchainConfig::default()
        .to_toml_string()
        .wrap_err("failed to render default config")?;
    fs::write(&path, contents).wrap_err("failed to write config")?;

    println!(
        "{GREY}initialized config in: {}",
        path.to_string_lossy().mint()
    );
    Ok(())
}
