//! Configuration file handling for scour.
//!
//! Looks for `.config/scour.toml` in the current directory or any parent
//! directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use scour::PurgeRules;
use serde::Deserialize;

/// Contents of `.config/scour.toml`. Everything is optional; command-line
/// flags take precedence over the file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Database connection URL.
    pub database_url: Option<String>,
    /// Path to the model manifest, relative to the directory holding
    /// `.config/`.
    pub models: Option<PathBuf>,
    /// Analyzer exclusion rules.
    #[serde(default)]
    pub rules: RulesSection,
}

/// The `[rules]` section.
#[derive(Debug, Default, Deserialize)]
pub struct RulesSection {
    /// Overrides the default reserved-column list when present.
    pub reserved: Option<Vec<String>>,
    /// Per-table blacklist: `[rules.blacklist]` with `table = ["col"]`.
    #[serde(default)]
    pub blacklist: HashMap<String, Vec<String>>,
}

impl RulesSection {
    /// Build the process-wide rules from this section.
    pub fn to_rules(&self) -> PurgeRules {
        let mut rules = PurgeRules::with_blacklist(self.blacklist.clone());
        if let Some(reserved) = &self.reserved {
            rules.reserved = reserved.clone();
        }
        rules
    }
}

/// Load configuration from `.config/scour.toml`, searching up the directory
/// tree.
pub fn load() -> Result<(Config, PathBuf), ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io(e.to_string()))?;
    load_from(&cwd)
}

/// Load configuration starting from a specific directory.
pub fn load_from(start: &Path) -> Result<(Config, PathBuf), ConfigError> {
    let config_path = find_config_file(start)?;
    let content =
        std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io(e.to_string()))?;

    let config: Config =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok((config, config_path))
}

/// Find `.config/scour.toml` by searching up the directory tree.
fn find_config_file(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".config/scour.toml");
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(ConfigError::NotFound);
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No `.config/scour.toml` found in any parent directory
    NotFound,
    /// I/O error reading the file
    Io(String),
    /// Parse error in the TOML file
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound => {
                write!(
                    f,
                    "No .config/scour.toml found in current directory or any parent"
                )
            }
            ConfigError::Io(e) => write!(f, "Failed to read .config/scour.toml: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse .config/scour.toml: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
