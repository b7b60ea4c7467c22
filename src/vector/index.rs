//! Embedding Index
//!
//! Append-only document corpus with parallel embeddings and linear-scan search.

use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::embedding::{Embedder, HashEmbedder};
use super::similarity::dot_product;
use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::metrics::{IndexMetrics, Operation};

/// Caller-supplied document metadata
pub type Metadata = BTreeMap<String, String>;

/// A stored document. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Insertion position in the corpus
    pub id: usize,
    pub text: String,
    /// Length in characters
    pub length: usize,
    pub metadata: Metadata,
}

/// Metadata attached to a search hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMetadata {
    pub id: usize,
    pub length: usize,
    /// Metadata given to `add_documents`, if any
    pub extra: Metadata,
}

/// A ranked search hit
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub document: String,
    pub score: f32,
    pub metadata: SearchMetadata,
}

/// Restricts a search to documents whose metadata matches
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Exact match on the `source` key
    pub source: Option<String>,
    /// Membership on the `doc_id` key
    pub doc_ids: Option<Vec<String>>,
}

impl SearchFilter {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_doc_ids<I, S>(mut self, doc_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doc_ids = Some(doc_ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.doc_ids.is_none()
    }

    pub fn matches(&self, metadata: &Metadata) -> bool {
        if let Some(source) = &self.source {
            if metadata.get("source") != Some(source) {
                return false;
            }
        }
        if let Some(doc_ids) = &self.doc_ids {
            match metadata.get("doc_id") {
                Some(id) if doc_ids.contains(id) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Parallel sequences; `embeddings[i]` belongs to `documents[i]`
#[derive(Debug, Default)]
struct Corpus {
    documents: Vec<Document>,
    embeddings: Vec<Vec<f32>>,
}

/// In-memory vector store for semantic document retrieval.
///
/// One reentrant lock guards the documents and embeddings together, so a
/// search never sees one sequence longer than the other. Share it between
/// threads with `Arc<EmbeddingIndex>`.
pub struct EmbeddingIndex<E: Embedder = HashEmbedder> {
    corpus: ReentrantMutex<RefCell<Corpus>>,
    /// Mirrors `documents.len()`, written under the lock
    size: AtomicUsize,
    embedder: E,
    config: IndexConfig,
    metrics: IndexMetrics,
}

impl Default for EmbeddingIndex<HashEmbedder> {
    fn default() -> Self {
        let config = IndexConfig::default();
        let embedder = HashEmbedder::new(config.embedding_dim);
        Self::build(config, embedder)
    }
}

impl EmbeddingIndex<HashEmbedder> {
    /// Create an index using the hash-seeded placeholder embedder
    pub fn new(config: IndexConfig) -> Result<Self> {
        config.validate()?;
        let embedder = HashEmbedder::new(config.embedding_dim);
        Ok(Self::build(config, embedder))
    }

    /// Create with default configuration and a custom dimension
    pub fn with_dimension(dim: usize) -> Result<Self> {
        Self::new(IndexConfig::default().with_dimension(dim))
    }
}

impl<E: Embedder> EmbeddingIndex<E> {
    /// Create an index around a custom embedder
    pub fn with_embedder(config: IndexConfig, embedder: E) -> Result<Self> {
        config.validate()?;
        if embedder.dimension() != config.embedding_dim {
            return Err(IndexError::DimensionMismatch {
                expected: config.embedding_dim,
                actual: embedder.dimension(),
            });
        }
        Ok(Self::build(config, embedder))
    }

    fn build(config: IndexConfig, embedder: E) -> Self {
        info!(
            "Initialized embedding index (dim={}, threshold={})",
            config.embedding_dim, config.score_threshold
        );
        Self {
            corpus: ReentrantMutex::new(RefCell::new(Corpus::default())),
            size: AtomicUsize::new(0),
            embedder,
            config,
            metrics: IndexMetrics::new(),
        }
    }

    /// Embed and append documents, returning how many were added.
    ///
    /// `metadatas[i]` is attached to `documents[i]`; missing entries default
    /// to empty maps. The batch is validated before anything is appended.
    pub fn add_documents<S: AsRef<str>>(
        &self,
        documents: &[S],
        metadatas: Option<&[Metadata]>,
    ) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }
        let start = Instant::now();

        let metadatas = metadatas.unwrap_or(&[]);
        if metadatas.len() > documents.len() {
            return Err(IndexError::MetadataLength {
                documents: documents.len(),
                metadatas: metadatas.len(),
            });
        }

        let texts: Vec<&str> = documents.iter().map(AsRef::as_ref).collect();
        let embeddings = self.embedder.embed_batch(&texts);
        if embeddings.len() != texts.len() {
            return Err(IndexError::EmbeddingCount {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }
        for embedding in &embeddings {
            self.check_dimension(embedding.len())?;
        }

        let total = {
            let guard = self.corpus.lock();
            let mut corpus = guard.borrow_mut();
            let base = corpus.documents.len();

            for (offset, (text, embedding)) in texts.iter().zip(embeddings).enumerate() {
                corpus.documents.push(Document {
                    id: base + offset,
                    text: text.to_string(),
                    length: text.chars().count(),
                    metadata: metadatas.get(offset).cloned().unwrap_or_default(),
                });
                corpus.embeddings.push(embedding);
            }
            let total = corpus.documents.len();
            self.size.store(total, Ordering::Release);
            total
        };

        info!("Added {} documents (total {})", texts.len(), total);
        self.metrics.record_documents_added(texts.len());
        self.metrics.record_operation(Operation::AddDocuments, start.elapsed());
        Ok(texts.len())
    }

    /// Top `top_k` documents scoring strictly above the threshold, best first
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchResult> {
        self.search_filtered(query, top_k, &SearchFilter::default())
    }

    /// `search` restricted to documents matching `filter`.
    ///
    /// Equal scores keep insertion order.
    pub fn search_filtered(
        &self,
        query: &str,
        top_k: usize,
        filter: &SearchFilter,
    ) -> Vec<SearchResult> {
        if query.is_empty() || top_k == 0 || self.is_empty() {
            return Vec::new();
        }
        let start = Instant::now();

        let query_embedding = self.embedder.embed(query);
        if query_embedding.len() != self.config.embedding_dim {
            warn!(
                "Query embedding has dimension {}, expected {}",
                query_embedding.len(),
                self.config.embedding_dim
            );
            return Vec::new();
        }

        let results: Vec<SearchResult> = {
            let guard = self.corpus.lock();
            let corpus = guard.borrow();

            let mut scored: Vec<(usize, f32)> = corpus
                .documents
                .iter()
                .zip(&corpus.embeddings)
                .filter(|(doc, _)| filter.is_empty() || filter.matches(&doc.metadata))
                .filter_map(|(doc, embedding)| {
                    let score = dot_product(&query_embedding, embedding);
                    (score > self.config.score_threshold).then_some((doc.id, score))
                })
                .collect();

            scored.sort_by(|a, b| b.1.total_cmp(&a.1));
            scored.truncate(top_k);

            scored
                .into_iter()
                .map(|(id, score)| {
                    let doc = &corpus.documents[id];
                    SearchResult {
                        document: doc.text.clone(),
                        score,
                        metadata: SearchMetadata {
                            id: doc.id,
                            length: doc.length,
                            extra: doc.metadata.clone(),
                        },
                    }
                })
                .collect()
        };

        debug!(
            "Search matched {} documents (top_k={}, corpus={})",
            results.len(),
            top_k,
            self.len()
        );
        self.metrics.record_results(results.len());
        self.metrics.record_operation(Operation::Search, start.elapsed());
        results
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        if actual != self.config.embedding_dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.config.embedding_dim,
                actual,
            });
        }
        Ok(())
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Document and embedding counts read under one lock
    pub fn corpus_lengths(&self) -> (usize, usize) {
        let guard = self.corpus.lock();
        let corpus = guard.borrow();
        (corpus.documents.len(), corpus.embeddings.len())
    }

    /// Document stored at `id`
    pub fn document(&self, id: usize) -> Option<Document> {
        self.corpus.lock().borrow().documents.get(id).cloned()
    }

    /// Embedding stored at `id`
    pub fn embedding(&self, id: usize) -> Option<Vec<f32>> {
        self.corpus.lock().borrow().embeddings.get(id).cloned()
    }

    /// Snapshot of all document texts in insertion order
    pub fn documents(&self) -> Vec<String> {
        self.corpus
            .lock()
            .borrow()
            .documents
            .iter()
            .map(|d| d.text.clone())
            .collect()
    }

    /// Get embedding dimension
    pub fn dimension(&self) -> usize {
        self.config.embedding_dim
    }

    pub fn threshold(&self) -> f32 {
        self.config.score_threshold
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn metrics(&self) -> &IndexMetrics {
        &self.metrics
    }
}
