//! Text embedding providers
//!
//! The recommender only depends on the [`Embedder`] trait. [`HashEmbedder`]
//! is the built-in provider: deterministic feature hashing with no model
//! files, so the service runs anywhere the catalog artifact was produced
//! with the same provider and dimensionality.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::similarity::cosine_similarity;

/// Errors that can occur while encoding text
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Input too long: {len} bytes (max {max})")]
    InputTooLong { len: usize, max: usize },

    #[error("Provider error: {0}")]
    Provider(String),
}

/// L2-normalized embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    /// Create a normalized embedding from raw components
    pub fn new(data: Vec<f32>) -> Self {
        Self(normalize(data))
    }

    /// Wrap components as-is (already normalized, e.g. loaded from disk)
    pub fn raw(data: Vec<f32>) -> Self {
        Self(data)
    }

    /// The neutral vector returned for text without content
    pub fn zeros(dimensions: usize) -> Self {
        Self(vec![0.0; dimensions])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn norm(&self) -> f32 {
        self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Cosine similarity in [-1, 1]
    ///
    /// Returns 0.0 for zero vectors or mismatched dimensions.
    pub fn similarity(&self, other: &Self) -> f32 {
        cosine_similarity(&self.0, &other.0)
    }
}

fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

/// Converts free text into a fixed-length semantic vector
///
/// Implementations must be deterministic for identical input and safe to
/// share across concurrently handled requests.
pub trait Embedder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    fn dimensions(&self) -> usize;

    fn name(&self) -> &str;
}

/// Default dimensionality, matching common sentence-embedding models
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Default input limit in bytes
pub const DEFAULT_MAX_INPUT_BYTES: usize = 8192;

/// Feature-hashing embedder
///
/// Terms are lower-cased alphanumeric runs of at least two characters,
/// hashed into buckets with FNV-1a and weighted by term frequency times a
/// length-based IDF approximation.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
    max_input_bytes: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter(|s| s.chars().count() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn term_vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() {
            return vec;
        }

        // Ordered so bucket collisions always accumulate in the same order
        let mut tf: BTreeMap<&str, f32> = BTreeMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in &tf {
            let freq = count / total;
            let idf = 1.0 + (term.chars().count() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += freq * idf;
        }

        vec
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl Embedder for HashEmbedder {
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text.len() > self.max_input_bytes {
            return Err(EmbeddingError::InputTooLong {
                len: text.len(),
                max: self.max_input_bytes,
            });
        }

        Ok(Embedding::new(self.term_vector(text)))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashing"
    }
}
