//! Error types for Lorcana Forge

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LorcanaError {
    #[error("Invalid card format: {0}")]
    InvalidCardFormat(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// An assembled ability broke a structural invariant (parser defect, not bad input)
    #[error("Structural violation in ability {ability}: {reason}")]
    StructuralViolation { ability: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LorcanaError {
    fn from(err: serde_json::Error) -> Self {
        LorcanaError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LorcanaError>;
