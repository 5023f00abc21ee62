//! Configuration for the translator front-ends.
//!
//! Config file resolution order:
//! 1. Explicit path passed to `Config::load()`
//! 2. SQX_CONFIG environment variable
//! 3. Default: `<platform config dir>/sqx/config.toml`
//!
//! A missing file at (2) or (3) yields the defaults; a missing explicit path
//! is an error.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::{Error, Language, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "SQX_CONFIG";

/// Translator front-end configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Source language assumed when none is given.
    #[serde(default = "default_source")]
    pub default_source: Language,

    /// How conversion results are printed.
    #[serde(default)]
    pub format: OutputFormat,

    /// `tracing` filter used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Output layout for conversion results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `language: query` line per target
    #[default]
    Table,
    /// JSON object keyed by language
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!("Unknown output format: {}", other))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn default_source() -> Language {
    Language::Spl
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source: default_source(),
            format: OutputFormat::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load config using the standard resolution order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from(path);
        }

        match resolve_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save config to a specific file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
    }
}

/// Resolve the config file path (env var, then platform config dir).
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    ProjectDirs::from("", "", "sqx").map(|dirs| dirs.config_dir().join("config.toml"))
}
