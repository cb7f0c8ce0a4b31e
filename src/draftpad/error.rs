use crate::model::DocumentId;
use thiserror::Error;

/// Failures of the persistent store. Any of these aborts the transition that
/// triggered the store call.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// The renderer rejected its input or one of its internal steps failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Render failed: {0}")]
pub struct RenderError(pub String);

#[derive(Error, Debug)]
pub enum DraftError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl From<std::io::Error> for DraftError {
    fn from(err: std::io::Error) -> Self {
        DraftError::Store(StoreError::Io(err))
    }
}

impl From<serde_json::Error> for DraftError {
    fn from(err: serde_json::Error) -> Self {
        DraftError::Store(StoreError::Serialization(err))
    }
}

pub type Result<T> = std::result::Result<T, DraftError>;
pub type StoreResult<T> = std::result::Result<T, StoreError>;
