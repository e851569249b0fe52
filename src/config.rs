use crate::castable::{StandardRules, Strategy, DEFAULT_MAX_POSITIONS, DEFAULT_MAX_SOURCES};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for a [crate::castable::Caster], loadable from JSON.
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    pub max_sources: usize,
    pub max_positions: usize,
    pub generic_source_is_wildcard: bool,
    pub strategy: Strategy,
}

impl Default for CastConfig {
    fn default() -> Self {
        CastConfig {
            max_sources: DEFAULT_MAX_SOURCES,
            max_positions: DEFAULT_MAX_POSITIONS,
            generic_source_is_wildcard: StandardRules::default().generic_source_is_wildcard,
            strategy: Strategy::default(),
        }
    }
}

impl CastConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: CastConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_sources == 0 || self.max_positions == 0 {
            return Err(ConfigError::Invalid(
                "max_sources and max_positions must be positive".to_string(),
            ));
        }
        if self
            .max_sources
            .checked_mul(self.max_positions)
            .map_or(true, |space| space > i32::MAX as usize)
        {
            return Err(ConfigError::Invalid(format!(
                "{} sources x {} positions does not fit the variable space",
                self.max_sources, self.max_positions
            )));
        }
        Ok(())
    }

    pub fn rules(&self) -> StandardRules {
        StandardRules {
            generic_source_is_wildcard: self.generic_source_is_wildcard,
        }
    }
}
