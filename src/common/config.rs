//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config < environment < CLI
use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "GIN_SYNC_";

const DEFAULT_MAX_WIDTH: usize = 80;
const MIN_OUTPUT_WIDTH: usize = 20;
const MAX_OUTPUT_WIDTH: usize = 500;

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "gin-sync")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("gin-sync.toml"))
}

/// When to colorize terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    /// Executable used for both git and `git annex`
    pub binary: String,
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            binary: "git".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Upper bound for status and progress bar lines
    pub max_width: usize,
    pub color: ColorMode,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            color: ColorMode::Auto,
        }
    }
}

/// Fully resolved application configuration after all layers merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub remote: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub git: GitSettings,
    pub output: OutputSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            log_file: None,
            git: GitSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

impl AppConfig {
    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.remote.trim().is_empty(),
            "Invalid config: remote must not be empty"
        );
        ensure!(
            !self.git.binary.trim().is_empty(),
            "Invalid config: git.binary must not be empty"
        );
        ensure!(
            self.output.max_width >= MIN_OUTPUT_WIDTH,
            "Invalid config: output.max_width must be >= {MIN_OUTPUT_WIDTH}"
        );
        ensure!(
            self.output.max_width <= MAX_OUTPUT_WIDTH,
            "Invalid config: output.max_width must be <= {MAX_OUTPUT_WIDTH}"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Loads config from defaults/file/env.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path();

    let config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Failed to load configuration")?;

    config.validate()?;

    Ok(config)
}

/// Applies command-line overrides to a loaded config.
pub fn apply_overrides(mut config: AppConfig, overrides: &ConfigOverrides) -> AppConfig {
    if let Some(remote) = &overrides.remote {
        config.remote = remote.clone();
    }
    if let Some(log_file) = &overrides.log_file {
        config.log_file = Some(log_file.clone());
    }

    config
}
