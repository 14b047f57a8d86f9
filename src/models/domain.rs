use serde::{Deserialize, Serialize};

use crate::services::embedding::Embedding;

/// User profile submitted for a recommendation request
///
/// Body metrics are carried for completeness but do not influence scoring.
/// Built from a validated [`RecommendRequest`](crate::models::RecommendRequest).
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub age: i32,
    pub height: i32,
    pub weight: i32,
    pub goals: Vec<String>,
    pub physical_issues: Vec<String>,
    pub mental_issues: Vec<String>,
    pub level: String,
}

impl UserProfile {
    /// Space-joined goals, the text encoded for goal/benefit alignment
    pub fn goals_text(&self) -> String {
        self.goals.join(" ")
    }

    pub fn physical_text(&self) -> String {
        self.physical_issues.join(" ")
    }

    pub fn mental_text(&self) -> String {
        self.mental_issues.join(" ")
    }

    /// Physical issues followed by mental issues, in submission order
    pub fn all_issues(&self) -> impl Iterator<Item = &str> {
        self.physical_issues
            .iter()
            .chain(self.mental_issues.iter())
            .map(String::as_str)
    }
}

/// Posture text as authored, before embedding
///
/// Column names of the tabular authoring sheet are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureText {
    #[serde(alias = "AName")]
    pub name: String,
    #[serde(alias = "Benefits", default)]
    pub benefits: String,
    #[serde(alias = "Contraindications", default)]
    pub contraindications: String,
    #[serde(alias = "Targeted Physical Problems", default)]
    pub targeted_physical_problems: String,
    #[serde(alias = "Targeted Mental Problems", default)]
    pub targeted_mental_problems: String,
}

/// A posture from the catalog with its precomputed embeddings
///
/// The catalog loader guarantees all four embeddings are present and share
/// one dimensionality. Records are read-only once built.
#[derive(Debug, Clone)]
pub struct PostureRecord {
    pub name: String,
    pub benefits: String,
    pub contraindications: String,
    pub targeted_physical_problems: String,
    pub targeted_mental_problems: String,
    pub benefits_emb: Embedding,
    pub contraindications_emb: Embedding,
    pub targeted_physical_emb: Embedding,
    pub targeted_mental_emb: Embedding,
    contraindications_lower: String,
}

impl PostureRecord {
    pub fn new(
        text: PostureText,
        benefits_emb: Embedding,
        contraindications_emb: Embedding,
        targeted_physical_emb: Embedding,
        targeted_mental_emb: Embedding,
    ) -> Self {
        Self {
            contraindications_lower: text.contraindications.to_lowercase(),
            name: text.name,
            benefits: text.benefits,
            contraindications: text.contraindications,
            targeted_physical_problems: text.targeted_physical_problems,
            targeted_mental_problems: text.targeted_mental_problems,
            benefits_emb,
            contraindications_emb,
            targeted_physical_emb,
            targeted_mental_emb,
        }
    }

    /// Lower-cased contraindications, computed once for lexical matching
    pub fn contraindications_lower(&self) -> &str {
        &self.contraindications_lower
    }

    /// The text fields, as written to a catalog artifact
    pub fn text(&self) -> PostureText {
        PostureText {
            name: self.name.clone(),
            benefits: self.benefits.clone(),
            contraindications: self.contraindications.clone(),
            targeted_physical_problems: self.targeted_physical_problems.clone(),
            targeted_mental_problems: self.targeted_mental_problems.clone(),
        }
    }
}

/// Scored recommendation result
///
/// `score` is already rounded to three decimals.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecommendation {
    pub name: String,
    pub score: f64,
    pub benefits: String,
    pub contraindications: String,
}

/// Scoring weights for the five similarity terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub goals_benefits: f64,
    pub physical_benefits: f64,
    pub mental_benefits: f64,
    pub physical_match: f64,
    pub mental_match: f64,
}

impl ScoringWeights {
    /// Sum of all weights, the divisor that normalizes the weighted sum
    pub fn total(&self) -> f64 {
        self.goals_benefits
            + self.physical_benefits
            + self.mental_benefits
            + self.physical_match
            + self.mental_match
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            goals_benefits: 4.0,
            physical_benefits: 4.0,
            mental_benefits: 4.0,
            physical_match: 2.0,
            mental_match: 2.0,
        }
    }
}
