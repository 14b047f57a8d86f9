use std::sync::Arc;
use thiserror::Error;

use crate::core::{
    filters::{encode_issues, is_contraindicated},
    scoring::{calculate_posture_score, round_score, ProfileEmbeddings},
};
use crate::models::{ScoredRecommendation, ScoringWeights, UserProfile};
use crate::services::{Catalog, Embedder, EmbeddingError};

/// Default similarity above which an issue rules a posture out
pub const DEFAULT_CONTRAINDICATION_THRESHOLD: f32 = 0.25;

/// Default size of the result window
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Errors that can occur while computing a recommendation
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("Failed to encode profile text: {0}")]
    Encoding(#[from] EmbeddingError),
}

/// Tunable parameters of the recommendation pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommenderSettings {
    pub weights: ScoringWeights,
    pub contraindication_threshold: f32,
    pub max_results: usize,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            contraindication_threshold: DEFAULT_CONTRAINDICATION_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Recommendation orchestrator - implements the filter/score/rank pipeline
///
/// # Pipeline Stages
/// 1. Encode profile texts and distinct issues (once per request)
/// 2. Contraindication filtering
/// 3. Weighted similarity scoring
/// 4. Ranking and truncation
///
/// Holds only shared read-only state, so one instance serves concurrent
/// requests.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    embedder: Arc<dyn Embedder>,
    settings: RecommenderSettings,
}

impl Recommender {
    pub fn new(catalog: Arc<Catalog>, embedder: Arc<dyn Embedder>, settings: RecommenderSettings) -> Self {
        Self {
            catalog,
            embedder,
            settings,
        }
    }

    pub fn with_default_settings(catalog: Arc<Catalog>, embedder: Arc<dyn Embedder>) -> Self {
        Self::new(catalog, embedder, RecommenderSettings::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Recommend postures for a user profile
    ///
    /// # Arguments
    /// * `profile` - The user's goals, issues and level
    ///
    /// # Returns
    /// At most `max_results` recommendations with a strictly positive score
    /// rounded to three decimals, sorted by that score descending (ties keep
    /// catalog order). An empty list means nothing was both safe and relevant.
    pub fn recommend(&self, profile: &UserProfile) -> Result<Vec<ScoredRecommendation>, RecommendError> {
        let embedder = self.embedder.as_ref();

        // Stage 1: Encode once per request
        let profile_embeddings = ProfileEmbeddings::encode(profile, embedder)?;
        let issues = encode_issues(profile, embedder)?;

        let mut excluded = 0usize;

        let mut recommendations: Vec<ScoredRecommendation> = self
            .catalog
            .iter()
            // Stage 2: Contraindication filtering
            .filter(|posture| {
                let unsafe_for_user =
                    is_contraindicated(posture, &issues, self.settings.contraindication_threshold);
                if unsafe_for_user {
                    excluded += 1;
                }
                !unsafe_for_user
            })
            // Stage 3: Scoring
            .filter_map(|posture| {
                let score = round_score(calculate_posture_score(
                    posture,
                    &profile_embeddings,
                    &self.settings.weights,
                ));

                // Non-positive scores are irrelevant, not merely weak
                if score > 0.0 {
                    Some(ScoredRecommendation {
                        name: posture.name.clone(),
                        score,
                        benefits: posture.benefits.clone(),
                        contraindications: posture.contraindications.clone(),
                    })
                } else {
                    None
                }
            })
            .collect();

        // Stage 4: Stable sort by score (descending)
        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let relevant = recommendations.len();
        recommendations.truncate(self.settings.max_results);

        tracing::info!(
            "Recommended {} postures ({} relevant, {} excluded, {} in catalog)",
            recommendations.len(),
            relevant,
            excluded,
            self.catalog.len()
        );

        Ok(recommendations)
    }
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("catalog_size", &self.catalog.len())
            .field("embedder", &self.embedder.name())
            .field("settings", &self.settings)
            .finish()
    }
}
