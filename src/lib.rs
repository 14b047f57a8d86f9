//! Asana Recommender - yoga posture recommendation service
//!
//! This library provides the recommendation engine: a contraindication
//! filter followed by weighted semantic-similarity scoring and ranking over
//! a precomputed posture catalog.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{Recommender, RecommenderSettings, RecommendError};
pub use models::{UserProfile, PostureRecord, PostureText, ScoredRecommendation, ScoringWeights, RecommendRequest, RecommendResponse};
pub use services::{Catalog, CatalogError, Embedder, Embedding, EmbeddingError, HashEmbedder};
