//! `config reset`: overwrite the config file with defaults.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use super::defaults_toml;

/// Rewrite `path` with defaults. Without `yes` the user must confirm on
/// `input`, which is refused outright when nobody is at the terminal.
pub(super) fn reset_config(
    path: &Path,
    yes: bool,
    interactive: bool,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<bool> {
    if !yes && !confirm(path, interactive, input, output)? {
        writeln!(output, "Kept {}", path.display())?;
        return Ok(false);
    }

    replace_file(path, &defaults_toml()?)?;
    writeln!(output, "Wrote defaults to {}", path.display())?;
    Ok(true)
}

fn confirm(
    path: &Path,
    interactive: bool,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<bool> {
    if !interactive {
        bail!("Not resetting {} without confirmation, pass --yes", path.display());
    }
    write!(output, "Overwrite {} with defaults? [y/N] ", path.display())?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Write `contents` to a synced sibling file, then rename it over `path`.
/// Readers see either the old file or the new one.
fn replace_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
    }

    let staging = staging_path(path);
    let mut file = fs::File::create(&staging)
        .with_context(|| format!("Failed to create {}", staging.display()))?;
    file.write_all(contents.as_bytes())
        .and_then(|_| file.sync_all())
        .with_context(|| format!("Failed to write {}", staging.display()))?;
    drop(file);

    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(err).with_context(|| format!("Failed to replace {}", path.display()));
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("config.toml");
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4()))
}
