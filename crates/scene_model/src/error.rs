//! Error types for scene model operations

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SceneModelError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Connector not found: {0}")]
    ConnectorNotFound(String),

    #[error("Duplicate connector for endpoint pair: {0}")]
    DuplicateConnector(String),

    #[error("Connector {connector} references missing node {node}")]
    DanglingConnector { connector: String, node: Uuid },

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),
}

pub type Result<T> = std::result::Result<T, SceneModelError>;
