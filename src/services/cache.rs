use std::sync::Arc;
use std::time::Duration;

use crate::models::{ScoredRecommendation, UserProfile};
use crate::services::embedding::{Embedder, Embedding, EmbeddingError};

/// Embedder wrapper that memoizes encodings by exact input text
///
/// Backed by a concurrent moka cache, so it can be shared by every request
/// handler without external locking. Failed encodings are not cached.
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    cache: moka::sync::Cache<String, Embedding>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, max_entries: u64) -> Self {
        let cache = moka::sync::Cache::builder()
            .max_capacity(max_entries)
            .build();

        Self { inner, cache }
    }
}

impl Embedder for CachedEmbedder {
    fn encode(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        if let Some(embedding) = self.cache.get(text) {
            tracing::trace!("Embedding cache hit: {:?}", text);
            return Ok(embedding);
        }

        let embedding = self.inner.encode(text)?;
        self.cache.insert(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Cache of finished recommendation lists keyed by profile content
///
/// Results are a pure function of the profile and the loaded catalog, so a
/// hit is indistinguishable from a recomputation.
pub struct RecommendationCache {
    cache: moka::future::Cache<String, Arc<Vec<ScoredRecommendation>>>,
}

impl RecommendationCache {
    /// Create a new cache with the given capacity and TTL
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Vec<ScoredRecommendation>>> {
        let hit = self.cache.get(key).await;
        if hit.is_some() {
            tracing::trace!("Recommendation cache hit: {}", key);
        } else {
            tracing::trace!("Recommendation cache miss: {}", key);
        }
        hit
    }

    pub async fn set(&self, key: String, recommendations: Arc<Vec<ScoredRecommendation>>) {
        self.cache.insert(key, recommendations).await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a profile's recommendations
    ///
    /// Only the fields that influence scoring participate. List order is
    /// preserved because the joined texts are encoded in submission order.
    pub fn recommendations(profile: &UserProfile) -> String {
        serde_json::json!([
            profile.goals,
            profile.physical_issues,
            profile.mental_issues,
        ])
        .to_string()
    }
}
