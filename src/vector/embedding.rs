//! Text Embeddings
//!
//! Placeholder embedding function and the `Embedder` seam for real models.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use sha2::{Digest, Sha256};

use super::similarity::normalize_vector;

/// Produces fixed-length, unit-norm vectors for text.
///
/// Implementations must be deterministic: the same text always yields the
/// same vector, and every vector has length `dimension()` and Euclidean norm 1.
pub trait Embedder: Send + Sync {
    /// Length of every vector returned by `embed`
    fn dimension(&self) -> usize;

    /// Embed a single text
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Embed multiple texts (batch processing)
    fn embed_batch(&self, texts: &[&str]) -> Vec<Vec<f32>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Hash-seeded embedder, stands in for a sentence-transformer model
#[derive(Debug, Clone, Copy)]
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Embedder for HashEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        deterministic_embed(text, self.dimension)
    }
}

/// Seed derived from the first 16 hex digits of the text's SHA-256 digest
pub fn text_seed(text: &str) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    // 8 leading bytes, big-endian == the 16-digit hex prefix read as an integer
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Deterministic unit vector of length `dim` for `text`.
///
/// Each call seeds its own generator, so concurrent calls never share RNG state.
/// A zero or non-finite norm falls back to the first basis vector.
pub fn deterministic_embed(text: &str, dim: usize) -> Vec<f32> {
    if dim == 0 {
        return Vec::new();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(text_seed(text));
    let mut v: Vec<f32> = (0..dim)
        .map(|_| rng.sample::<f32, _>(StandardNormal))
        .collect();

    if normalize_vector(&mut v) {
        v
    } else {
        basis_vector(dim)
    }
}

fn basis_vector(dim: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[0] = 1.0;
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::similarity::{dot_product, magnitude};

    #[test]
    fn test_deterministic() {
        let a = deterministic_embed("The sky is blue", 384);
        let b = deterministic_embed("The sky is blue", 384);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unit_norm() {
        for text in ["", "a", "quantum physics lecture", "ünïcödé テキスト"] {
            let v = deterministic_embed(text, 384);
            assert_eq!(v.len(), 384);
            assert!((magnitude(&v) - 1.0).abs() < 1e-5, "norm of {text:?}");
            assert!(v.iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_different_texts_differ() {
        let a = deterministic_embed("apple banana", 384);
        let b = deterministic_embed("quantum physics lecture", 384);
        assert_ne!(a, b);
        assert!(dot_product(&a, &b) < 0.3);
    }

    #[test]
    fn test_single_dimension() {
        let v = deterministic_embed("x", 1);
        assert_eq!(v.len(), 1);
        assert!((v[0].abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dimension_is_empty() {
        assert!(deterministic_embed("x", 0).is_empty());
    }

    #[test]
    fn test_basis_fallback() {
        assert_eq!(basis_vector(3), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_seed_is_stable() {
        assert_eq!(text_seed("hello"), text_seed("hello"));
        assert_ne!(text_seed("hello"), text_seed("hello "));
    }

    #[test]
    fn test_hash_embedder() {
        let embedder = HashEmbedder::new(16);
        assert_eq!(embedder.dimension(), 16);
        let batch = embedder.embed_batch(&["a", "b"]);
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], deterministic_embed("a", 16));
    }
}
