//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading statutory
//! constants from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::{
    BracketCalculatorDefinition, EngineConfig, JurisdictionConfig, JurisdictionMetadata,
    StatutoryConstants,
};

/// Loads and provides access to statutory constants.
///
/// The `ConfigLoader` reads YAML configuration files from a directory once
/// at start-up; afterwards the constants are only read.
///
/// # Directory Structure
///
/// ```text
/// config/tr/
/// ├── jurisdiction.yaml   # Metadata and bracket calculator definitions
/// └── years/
///     ├── 2024.yaml       # Constants applying from 2024
///     └── 2025.yaml       # Constants applying from 2025
/// ```
///
/// # Example
///
/// ```no_run
/// use statutory_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/tr").unwrap();
/// let constants = loader.constants_for_year(2024).unwrap();
/// println!("Severance ceiling: {}", constants.severance.annual_ceiling);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML or an invalid bracket table
    /// - Any rate is negative
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let jurisdiction_path = path.join("jurisdiction.yaml");
        let jurisdiction = Self::load_yaml::<JurisdictionConfig>(&jurisdiction_path)?;

        let years_dir = path.join("years");
        let years = Self::load_years(&years_dir)?;

        info!(
            jurisdiction = %jurisdiction.jurisdiction.code,
            years = years.len(),
            bracket_calculators = jurisdiction.bracket_calculators.len(),
            "Loaded statutory configuration"
        );

        Ok(Self::from_config(EngineConfig::new(
            jurisdiction.jurisdiction,
            jurisdiction.bracket_calculators,
            years,
        )))
    }

    /// Wraps an already assembled configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads and validates all constant files from the years directory.
    fn load_years(years_dir: &Path) -> EngineResult<Vec<StatutoryConstants>> {
        let years_dir_str = years_dir.display().to_string();

        let entries = fs::read_dir(years_dir).map_err(|_| EngineError::ConfigNotFound {
            path: years_dir_str.clone(),
        })?;

        let mut years = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: years_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let constants = Self::load_yaml::<StatutoryConstants>(&path)?;
                constants
                    .validate()
                    .map_err(|message| EngineError::ConfigParseError {
                        path: path.display().to_string(),
                        message,
                    })?;
                years.push(constants);
            }
        }

        if years.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no constant files found)", years_dir_str),
            });
        }

        Ok(years)
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &JurisdictionMetadata {
        self.config.jurisdiction()
    }

    /// Returns the configured bracket calculator definitions.
    pub fn bracket_calculators(&self) -> &[BracketCalculatorDefinition] {
        self.config.bracket_calculators()
    }

    /// Returns the constants applying to `year`.
    pub fn constants_for_year(&self, year: i32) -> EngineResult<&StatutoryConstants> {
        self.config.constants_for_year(year)
    }
}
