//! Error Types
//!
//! Failures surfaced by the index, configuration and ingestion layers.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by semdex operations
#[derive(Debug, Error)]
pub enum IndexError {
    /// A vector did not have the configured dimensionality
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Embedder returned a different number of vectors than texts
    #[error("Embedding count mismatch: expected {expected}, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },

    /// More metadata maps than documents were supplied
    #[error("Metadata length mismatch: {metadatas} metadata maps for {documents} documents")]
    MetadataLength { documents: usize, metadatas: usize },

    /// Rejected configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// File could not be read during ingestion
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
