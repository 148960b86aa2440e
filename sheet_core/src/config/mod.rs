//! Reference data loading from TOML files

mod advancements;
mod catalog;
mod reference;

pub use advancements::{AdvancementDef, AdvancementTable};
pub use catalog::{
    AncestryDef, ArmorDef, ClassDef, CommunityDef, DomainCard, ExperienceCatalog, SubclassDef,
    WeaponDef, Weapons,
};
pub use reference::ReferenceData;

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Reference data loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read reference data file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid reference data: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Parse a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}
