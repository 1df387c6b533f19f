//! Configuration handling for the trackbin CLI
//!
//! Supports loading configuration from trackbin.toml files with CLI argument overrides.

use anyhow::{Result, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trackbin_core::Validation;

use crate::TrackArgs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracks: TracksConfig,

    #[serde(default)]
    pub validation: Validation,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksConfig {
    /// Directory holding track files and reads_<genome>.txt
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Genome assembly identifier
    #[serde(default = "default_genome")]
    pub genome: String,

    /// Track mode label
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Bin width in base pairs
    #[serde(default = "default_bin_width")]
    pub bin_width: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

// Default value functions
fn default_dir() -> PathBuf { PathBuf::from(".") }
fn default_genome() -> String { "hg19".to_string() }
fn default_mode() -> String { "100".to_string() }
fn default_bin_width() -> u64 { 100 }

impl Default for TracksConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            genome: default_genome(),
            mode: default_mode(),
            bin_width: default_bin_width(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: false }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tracks: TracksConfig::default(),
            validation: Validation::default(),
            output: OutputConfig::default(),
        }
    }
}

impl TracksConfig {
    /// Apply command line overrides on top of file values
    pub fn with_overrides(&self, args: &TrackArgs) -> Self {
        Self {
            dir: args.dir.clone().unwrap_or_else(|| self.dir.clone()),
            genome: args.genome.clone().unwrap_or_else(|| self.genome.clone()),
            mode: args.mode.clone().unwrap_or_else(|| self.mode.clone()),
            bin_width: args.bin_width.unwrap_or(self.bin_width),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => {
                log::info!("Loading configuration from: {}", path.display());
                Self::load_from_file(path)?
            }
            None => {
                // Try to find trackbin.toml in current directory
                let default_path = PathBuf::from("trackbin.toml");
                if default_path.exists() {
                    log::info!("Loading configuration from: trackbin.toml");
                    Self::load_from_file(&default_path)?
                } else {
                    log::debug!("Using default configuration");
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tracks.genome, "hg19");
        assert_eq!(config.tracks.bin_width, 100);
        assert!(config.validation.check_bounds);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_config_roundtrip() -> Result<()> {
        let mut config = Config::default();
        config.tracks.genome = "mm10".to_string();
        config.validation.expected_magic = Some(42);
        let temp_file = NamedTempFile::new()?;

        config.save_to_file(temp_file.path())?;
        let loaded_config = Config::load_from_file(temp_file.path())?;

        assert_eq!(loaded_config.tracks.genome, "mm10");
        assert_eq!(loaded_config.tracks.bin_width, config.tracks.bin_width);
        assert_eq!(loaded_config.validation, config.validation);

        Ok(())
    }

    #[test]
    fn test_partial_config() -> Result<()> {
        let config: Config = toml::from_str(
            "[tracks]\nbin_width = 1000\n\n[validation]\ncheck_bin_width = true\n",
        )?;
        assert_eq!(config.tracks.bin_width, 1000);
        assert_eq!(config.tracks.mode, "100");
        assert!(config.validation.check_bin_width);
        assert!(config.validation.check_bounds);
        Ok(())
    }

    #[test]
    fn test_overrides() {
        let tracks = TracksConfig::default();
        let args = TrackArgs {
            dir: Some(PathBuf::from("/data")),
            genome: None,
            mode: Some("200".to_string()),
            bin_width: Some(50),
        };

        let merged = tracks.with_overrides(&args);
        assert_eq!(merged.dir, PathBuf::from("/data"));
        assert_eq!(merged.genome, "hg19");
        assert_eq!(merged.mode, "200");
        assert_eq!(merged.bin_width, 50);
    }

    #[test]
    fn test_default_toml_sections() -> Result<()> {
        let example = Config::default().to_toml()?;
        assert!(example.contains("[tracks]"));
        assert!(example.contains("[validation]"));
        assert!(example.contains("[output]"));
        Ok(())
    }
}
