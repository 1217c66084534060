//! Configuration loading and management for the Statutory Calculation Engine.
//!
//! This module loads year-versioned statutory constants (severance ceiling,
//! tax rates, bracket tables, support percentages) from YAML files. The
//! figures are jurisdiction/year-specific sample values supplied externally;
//! calculators receive them explicitly rather than reading global state.
//!
//! # Example
//!
//! ```no_run
//! use statutory_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/tr").unwrap();
//! println!("Loaded jurisdiction: {}", config.jurisdiction().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AlimonyConstants, BracketCalculatorDefinition, BracketMode, EngineConfig, JurisdictionConfig,
    JurisdictionMetadata, NoticeConstants, SeveranceConstants, StatutoryConstants,
};

#[cfg(test)]
pub(crate) use types::test_constants;
