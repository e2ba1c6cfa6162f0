//! Handlers for `gin-sync config`. These only touch the config file and
//! never need a repository.

mod reset;
mod show;

use std::io;

use anyhow::{Context, Result};

use crate::common::config::{config_path, AppConfig};

/// Default settings as TOML, the same text `config reset` writes.
fn defaults_toml() -> Result<String> {
    toml::to_string_pretty(&AppConfig::default()).context("Failed to serialize default config")
}

pub fn run_config_path() -> Result<()> {
    show::write_path(&config_path(), &mut io::stdout().lock())
}

pub fn run_config_show() -> Result<()> {
    show::write_config(
        &config_path(),
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )
}

/// Returns whether the file was rewritten.
pub fn run_config_reset(yes: bool) -> Result<bool> {
    let interactive = io::IsTerminal::is_terminal(&io::stdin());
    reset::reset_config(
        &config_path(),
        yes,
        interactive,
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
    )
}
