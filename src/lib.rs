//! SEMDEX - Minimal In-Memory Vector Store
//!
//! Append-only document corpus with deterministic embeddings and
//! thresholded similarity search for semantic retrieval.

pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod vector;

pub use config::{ChunkConfig, IndexConfig};
pub use error::{IndexError, Result};
pub use ingest::{chunk_text, IngestReport, Ingestor};
pub use metrics::{IndexMetrics, Operation};
pub use vector::{
    deterministic_embed, Document, Embedder, EmbeddingIndex, HashEmbedder, Metadata,
    SearchFilter, SearchMetadata, SearchResult,
};
