//! Error types for the simulation.

use crate::types::{EntityId, Position};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Position {position} is outside the {size}x{size} grid")]
    OutOfBounds { position: Position, size: i32 },

    #[error("Entity {0} is not on the grid")]
    LookupFailure(EntityId),

    #[error("Target landmine {0} is no longer on the grid")]
    StaleTarget(EntityId),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
