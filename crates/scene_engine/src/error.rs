//! Error types for scene engine operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid coordinates")]
    InvalidCoordinates,

    #[error("Invalid command argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Model(#[from] scene_model::SceneModelError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
