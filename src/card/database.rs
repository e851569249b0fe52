use crate::card::types::{ManaSource, SymbolSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LandDatabaseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Land not found: {0}")]
    LandNotFound(String),
    #[error("Invalid land data: {0}")]
    InvalidLand(String),
}

/// Land card as stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandCard {
    pub name: String,
    pub produces: SymbolSet,
}

impl LandCard {
    pub fn to_source(&self) -> ManaSource {
        ManaSource::named(self.name.clone(), self.produces)
    }
}

/// Land database that loads lands from JSON
pub struct LandDatabase {
    lands: HashMap<String, LandCard>,
}

impl LandDatabase {
    /// Load lands from a JSON file
    pub fn from_file(path: &str) -> Result<Self, LandDatabaseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, LandDatabaseError> {
        let lands_vec: Vec<LandCard> = serde_json::from_str(content)?;

        let mut lands = HashMap::new();
        for land in lands_vec {
            if land.produces.is_empty() {
                return Err(LandDatabaseError::InvalidLand(format!(
                    "{} produces no mana",
                    land.name
                )));
            }
            lands.insert(land.name.clone(), land);
        }

        log::debug!("Loaded {} lands", lands.len());
        Ok(LandDatabase { lands })
    }

    /// Get a land by name
    pub fn get_land(&self, name: &str) -> Result<LandCard, LandDatabaseError> {
        self.lands
            .get(name)
            .cloned()
            .ok_or_else(|| LandDatabaseError::LandNotFound(name.to_string()))
    }

    /// Get all land names
    pub fn land_names(&self) -> Vec<&str> {
        self.lands.keys().map(|s| s.as_str()).collect()
    }

    pub fn land_count(&self) -> usize {
        self.lands.len()
    }

    pub fn validate(&self) -> Result<(), LandDatabaseError> {
        if self.lands.is_empty() {
            return Err(LandDatabaseError::InvalidLand("No lands loaded".to_string()));
        }
        Ok(())
    }
}
