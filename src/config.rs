//! Index Configuration

use crate::error::{IndexError, Result};
use std::str::FromStr;

/// Default embedding dimensionality (all-MiniLM-L6-v2 compatible)
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Scores must be strictly above this to be returned
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.3;

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_CHUNK_SIZE: usize = 900;
pub const DEFAULT_CHUNK_OVERLAP: usize = 120;

/// Chunking parameters for ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Window size in characters
    pub chunk_size: usize,

    /// Characters shared between consecutive windows
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(IndexError::InvalidConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(IndexError::InvalidConfig(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Index configuration
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Length of every stored embedding
    pub embedding_dim: usize,

    /// Minimum (exclusive) similarity for a search hit
    pub score_threshold: f32,

    /// Result count used by callers that don't pass one
    pub default_top_k: usize,

    /// Ingestion chunking
    pub chunking: ChunkConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            default_top_k: DEFAULT_TOP_K,
            chunking: ChunkConfig::default(),
        }
    }
}

impl IndexConfig {
    /// Build a config from `SEMDEX_*` environment variables, falling back to defaults.
    ///
    /// Binaries load `.env` with `dotenvy` before calling this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            embedding_dim: lookup_or(&lookup, "SEMDEX_EMBEDDING_DIM", defaults.embedding_dim)?,
            score_threshold: lookup_or(
                &lookup,
                "SEMDEX_SCORE_THRESHOLD",
                defaults.score_threshold,
            )?,
            default_top_k: lookup_or(&lookup, "SEMDEX_DEFAULT_TOP_K", defaults.default_top_k)?,
            chunking: ChunkConfig {
                chunk_size: lookup_or(
                    &lookup,
                    "SEMDEX_CHUNK_SIZE",
                    defaults.chunking.chunk_size,
                )?,
                overlap: lookup_or(&lookup, "SEMDEX_CHUNK_OVERLAP", defaults.chunking.overlap)?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Set embedding dimension
    pub fn with_dimension(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    /// Set similarity threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.default_top_k = top_k;
        self
    }

    pub fn with_chunking(mut self, chunking: ChunkConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 {
            return Err(IndexError::InvalidConfig(
                "embedding_dim must be greater than zero".to_string(),
            ));
        }
        if !self.score_threshold.is_finite() || !(-1.0..=1.0).contains(&self.score_threshold) {
            return Err(IndexError::InvalidConfig(format!(
                "score_threshold must be within [-1, 1], got {}",
                self.score_threshold
            )));
        }
        self.chunking.validate()
    }
}

fn lookup_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| IndexError::InvalidConfig(format!("{key}: cannot parse {raw:?}")))
}
