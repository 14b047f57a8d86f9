// Service exports
pub mod cache;
pub mod catalog;
pub mod embedding;
#[cfg(feature = "minilm")]
pub mod minilm;
pub mod provider;

pub use cache::{CachedEmbedder, CacheKey, RecommendationCache};
pub use catalog::{Catalog, CatalogError};
pub use embedding::{Embedder, Embedding, EmbeddingError, HashEmbedder};
pub use provider::build_embedder;
#[cfg(feature = "minilm")]
pub use minilm::MiniLmEmbedder;
