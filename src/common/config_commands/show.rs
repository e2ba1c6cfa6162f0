use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use super::defaults_toml;

/// `config path`: where settings are read from, whether or not the file exists.
pub(super) fn write_path(path: &Path, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", path.display()).context("Failed to print config path")
}

/// `config show`: the file as stored. A missing file shows the defaults, with
/// the note going to `notes` so `out` stays valid TOML.
pub(super) fn write_config(path: &Path, out: &mut dyn Write, notes: &mut dyn Write) -> Result<()> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            writeln!(notes, "No config file at {}, showing defaults", path.display())?;
            defaults_toml()?
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("Failed to read config file {}", path.display()))
        }
    };
    out.write_all(text.as_bytes())?;
    Ok(())
}
