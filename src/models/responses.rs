use serde::{Deserialize, Serialize};
use crate::models::domain::ScoredRecommendation;

/// A single recommended posture as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsanaRecommendation {
    pub name: String,
    pub score: f64,
    pub benefits: String,
    pub contraindications: String,
}

impl From<ScoredRecommendation> for AsanaRecommendation {
    fn from(rec: ScoredRecommendation) -> Self {
        Self {
            name: rec.name,
            score: rec.score,
            benefits: rec.benefits,
            contraindications: rec.contraindications,
        }
    }
}

/// Response for the recommend endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommended_asanas: Vec<AsanaRecommendation>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub catalog_size: usize,
    pub embedding_provider: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
