use crate::models::{PostureRecord, ScoringWeights, UserProfile};
use crate::services::embedding::{Embedder, Embedding, EmbeddingError};

/// Embeddings of the three aggregate profile texts, computed once per request
#[derive(Debug, Clone)]
pub struct ProfileEmbeddings {
    pub goals: Embedding,
    pub physical: Embedding,
    pub mental: Embedding,
}

impl ProfileEmbeddings {
    /// Encode the space-joined goals, physical issues and mental issues
    pub fn encode(profile: &UserProfile, embedder: &dyn Embedder) -> Result<Self, EmbeddingError> {
        Ok(Self {
            goals: embedder.encode(&profile.goals_text())?,
            physical: embedder.encode(&profile.physical_text())?,
            mental: embedder.encode(&profile.mental_text())?,
        })
    }
}

/// Calculate the relevance score of a posture for a profile
///
/// Scoring formula:
/// score = (
///     sim(goals, benefits) * 4 +
///     sim(physical, benefits) * 4 +
///     sim(mental, benefits) * 4 +
///     sim(physical, targeted physical problems) * 2 +
///     sim(mental, targeted mental problems) * 2
/// ) / 16
///
/// The result stays in the cosine range [-1, 1].
pub fn calculate_posture_score(
    posture: &PostureRecord,
    profile: &ProfileEmbeddings,
    weights: &ScoringWeights,
) -> f64 {
    let total_weight = weights.total();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let goals_benefits = profile.goals.similarity(&posture.benefits_emb) as f64;
    let physical_benefits = profile.physical.similarity(&posture.benefits_emb) as f64;
    let mental_benefits = profile.mental.similarity(&posture.benefits_emb) as f64;
    let physical_match = profile.physical.similarity(&posture.targeted_physical_emb) as f64;
    let mental_match = profile.mental.similarity(&posture.targeted_mental_emb) as f64;

    let weighted = goals_benefits * weights.goals_benefits
        + physical_benefits * weights.physical_benefits
        + mental_benefits * weights.mental_benefits
        + physical_match * weights.physical_match
        + mental_match * weights.mental_match;

    weighted / total_weight
}

/// Round a score to the three decimals clients see
///
/// Ranking happens on the rounded value, so postures that tie once rounded
/// keep catalog order.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
