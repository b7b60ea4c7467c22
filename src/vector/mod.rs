//! Vector Module
//!
//! Embedding generation, similarity math and the in-memory embedding index.

mod embedding;
mod index;
mod similarity;

pub use embedding::{deterministic_embed, text_seed, Embedder, HashEmbedder};
pub use index::{Document, EmbeddingIndex, Metadata, SearchFilter, SearchMetadata, SearchResult};
pub use similarity::{cosine_similarity, dot_product, magnitude, normalize_vector};
