//! Sentence-transformer embeddings via fastembed
//!
//! Runs `all-MiniLM-L6-v2` locally through ONNX. The model is downloaded
//! into the cache directory on first use.

use std::path::PathBuf;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::services::embedding::{Embedder, Embedding, EmbeddingError};

/// Output dimensionality of all-MiniLM-L6-v2
pub const MINILM_DIMENSIONS: usize = 384;

/// `all-MiniLM-L6-v2` sentence embedder
///
/// `TextEmbedding::embed` needs `&mut self`, so the model sits behind a mutex.
pub struct MiniLmEmbedder {
    model: Mutex<TextEmbedding>,
    max_input_bytes: usize,
}

impl MiniLmEmbedder {
    pub fn new(cache_dir: Option<PathBuf>, max_input_bytes: usize) -> Result<Self, EmbeddingError> {
        let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
            .with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::Provider(format!("failed to load all-MiniLM-L6-v2: {}", e)))?;

        tracing::info!("Loaded all-MiniLM-L6-v2 ({} dimensions)", MINILM_DIMENSIONS);

        Ok(Self {
            model: Mutex::new(model),
            max_input_bytes,
        })
    }
}

impl Embedder for MiniLmEmbedder {
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if text.len() > self.max_input_bytes {
            return Err(EmbeddingError::InputTooLong {
                len: text.len(),
                max: self.max_input_bytes,
            });
        }

        // Empty text maps to the neutral vector, as with the hashing provider
        if text.trim().is_empty() {
            return Ok(Embedding::zeros(MINILM_DIMENSIONS));
        }

        let mut model = self
            .model
            .lock()
            .map_err(|_| EmbeddingError::Provider("model lock poisoned".to_string()))?;

        let vector = model
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError::Provider(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Provider("model returned no embedding".to_string()))?;

        if vector.len() != MINILM_DIMENSIONS {
            return Err(EmbeddingError::Provider(format!(
                "model returned {} dimensions, expected {}",
                vector.len(),
                MINILM_DIMENSIONS
            )));
        }

        Ok(Embedding::new(vector))
    }

    fn dimensions(&self) -> usize {
        MINILM_DIMENSIONS
    }

    fn name(&self) -> &str {
        "minilm"
    }
}
