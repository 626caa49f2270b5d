//! Error types for the RAG store

use crate::document::DocumentId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for RAG store operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Error types that can occur in RAG store operations
#[derive(Error, Debug)]
pub enum RagError {
    /// The embedding provider returned no vector for the given text.
    #[error("Embedding provider returned no vector")]
    EmbeddingFailure,

    /// The document is held in memory but the collection file was not written.
    #[error("Failed to persist document {id} to {}: {reason}", path.display())]
    PersistenceFailure {
        id: DocumentId,
        path: PathBuf,
        reason: String,
    },

    /// The collection file exists but could not be read or parsed.
    #[error("Corrupt store at {}: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl RagError {
    /// The id of a document that was inserted in memory despite the error, if any.
    pub fn document_id(&self) -> Option<&DocumentId> {
        match self {
            RagError::PersistenceFailure { id, .. } => Some(id),
            _ => None,
        }
    }
}
