//! Ingestion Module
//!
//! Text chunking and file loading in front of the embedding index.

mod chunker;
mod loader;

pub use chunker::{chunk_source, chunk_text, Chunk};
pub use loader::{collect_files, load_text_file, IngestReport, Ingestor, SUPPORTED_EXTENSIONS};
