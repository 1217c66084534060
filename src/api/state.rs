//! Application state for the Statutory Calculation Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::CalculatorRegistry;
use crate::config::ConfigLoader;
use crate::error::EngineResult;

/// Shared application state.
///
/// Holds the loaded statutory constants and the calculator registry. Both
/// are read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    registry: Arc<CalculatorRegistry>,
}

impl AppState {
    /// Creates the state from loaded configuration, registering the default
    /// calculators plus every configured bracket calculator.
    pub fn new(config: ConfigLoader) -> EngineResult<Self> {
        let registry = CalculatorRegistry::with_defaults(config.bracket_calculators())?;
        Ok(Self::with_registry(config, registry))
    }

    /// Creates the state from an already populated registry.
    pub fn with_registry(config: ConfigLoader, registry: CalculatorRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns a reference to the calculator registry.
    pub fn registry(&self) -> &CalculatorRegistry {
        &self.registry
    }
}
