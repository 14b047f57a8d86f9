use std::sync::Arc;

use crate::config::EmbeddingSettings;
use crate::services::cache::CachedEmbedder;
use crate::services::embedding::{Embedder, EmbeddingError, HashEmbedder};

/// Default number of memoized encodings
pub const DEFAULT_EMBEDDING_CACHE_SIZE: u64 = 10_000;

/// Build the configured embedding provider
///
/// `hashing` is always available. `minilm` needs the `minilm` feature.
/// The provider is wrapped in a [`CachedEmbedder`] unless `cache_size` is 0.
pub fn build_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let base: Arc<dyn Embedder> = match settings.provider.as_str() {
        "hashing" => Arc::new(
            HashEmbedder::new(settings.dimensions).with_max_input_bytes(settings.max_input_bytes),
        ),
        "minilm" => minilm(settings)?,
        other => {
            return Err(EmbeddingError::Provider(format!(
                "unknown embedding provider '{}'",
                other
            )));
        }
    };

    if base.dimensions() != settings.dimensions {
        tracing::warn!(
            "Provider {} produces {} dimensions, ignoring configured {}",
            base.name(),
            base.dimensions(),
            settings.dimensions
        );
    }

    let cache_size = settings.cache_size.unwrap_or(DEFAULT_EMBEDDING_CACHE_SIZE);
    if cache_size == 0 {
        return Ok(base);
    }

    Ok(Arc::new(CachedEmbedder::new(base, cache_size)))
}

#[cfg(feature = "minilm")]
fn minilm(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let cache_dir = settings.model_cache_dir.as_ref().map(std::path::PathBuf::from);
    let embedder = crate::services::minilm::MiniLmEmbedder::new(cache_dir, settings.max_input_bytes)?;
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "minilm"))]
fn minilm(_settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    Err(EmbeddingError::Provider(
        "provider 'minilm' requires building with the `minilm` feature".to_string(),
    ))
}
