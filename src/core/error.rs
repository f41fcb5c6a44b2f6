use thiserror::Error;

use crate::core::types::EntityId;

#[derive(Error, Debug)]
pub enum AnatomyError {
    #[error("Body type not found: {0}")]
    BodyTypeNotFound(String),

    #[error("Part '{part}' not found in body type '{body_type}'")]
    PartNotFound { body_type: String, part: String },

    #[error("Material '{material}' referenced by part '{part}' not found")]
    MaterialNotFound { part: String, material: String },

    #[error("Entity not found: {0:?}")]
    EntityNotFound(EntityId),

    #[error("Capacity exceeded: {what} (limit {limit})")]
    CapacityExceeded { limit: usize, what: String },

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnatomyError>;
