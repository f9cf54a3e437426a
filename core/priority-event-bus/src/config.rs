//! Bus configuration
//!
//! Loaded from TOML or built in code. Every field has a default, so an
//! empty document yields [`BusConfig::default`].
//!
//! ```toml
//! default_priority = 5
//! max_listeners_per_category = 64
//! ```

use crate::error::BusError;
use crate::listener::DEFAULT_PRIORITY;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    /// Priority given to registrations that do not set one
    pub default_priority: i32,
    
    /// Upper bound on listeners per category (None = unbounded)
    pub max_listeners_per_category: Option<usize>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY,
            max_listeners_per_category: None,
        }
    }
}

impl BusConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, BusError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
    
    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = priority;
        self
    }
    
    pub fn with_max_listeners(mut self, limit: usize) -> Self {
        self.max_listeners_per_category = Some(limit);
        self
    }
    
    pub fn validate(&self) -> Result<(), BusError> {
        if self.max_listeners_per_category == Some(0) {
            return Err(BusError::InvalidArgument(
                "max_listeners_per_category must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
