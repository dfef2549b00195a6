//! Configuration management for the CLI.
//!
//! The configuration file is an engine configuration document with an
//! optional `[cli]` table for display settings:
//!
//! ```toml
//! [cli]
//! color = false
//! format = "json"
//!
//! [timeline]
//! sigma = 2.5
//! ```

use crate::error::{CliError, Result};
use credo_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Display settings
    pub settings: Settings,

    /// Engine configuration
    pub engine: EngineConfig,

    /// File the configuration was read from, if any
    pub source: Option<PathBuf>,
}

/// Display settings from the `[cli]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

#[derive(Deserialize)]
struct CliSection {
    #[serde(default)]
    cli: Settings,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".credo").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one the default path is used
    /// when present, and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::parse(&contents)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse a configuration document.
    pub fn parse(contents: &str) -> Result<Self> {
        let section: CliSection = toml::from_str(contents)?;
        let engine = EngineConfig::from_toml_str(contents)?;
        Ok(Self {
            settings: section.cli,
            engine,
            source: None,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.engine, EngineConfig::default());
    }

    #[test]
    fn test_parse_with_cli_section() {
        let config = Config::parse(
            r#"
            [cli]
            color = false
            format = "json"

            [stability]
            critical_alert_count = 4
            "#,
        )
        .unwrap();
        assert!(!config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert_eq!(config.engine.stability.critical_alert_count, 4);
    }

    #[test]
    fn test_invalid_engine_section() {
        let result = Config::parse("[timeline]\nema_alpha = 2.0");
        assert!(matches!(result, Err(CliError::EngineConfig(_))));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let result = Config::load(Some(Path::new("/nonexistent/credo.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nparallel = false").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(!config.engine.engine.parallel);
        assert_eq!(config.source.as_deref(), Some(file.path()));
    }
}
