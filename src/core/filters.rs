use crate::core::similarity::exceeds_threshold;
use crate::models::{PostureRecord, UserProfile};
use crate::services::embedding::{Embedder, Embedding, EmbeddingError};

/// A user issue prepared for contraindication checks
#[derive(Debug, Clone)]
pub struct EncodedIssue {
    /// Lower-cased issue text
    pub text: String,
    pub embedding: Embedding,
}

/// Encode each distinct issue of a profile once
///
/// Issues are lower-cased, then deduplicated keeping first-occurrence order
/// (physical issues first, then mental issues).
pub fn encode_issues(
    profile: &UserProfile,
    embedder: &dyn Embedder,
) -> Result<Vec<EncodedIssue>, EmbeddingError> {
    let mut encoded: Vec<EncodedIssue> = Vec::new();

    for issue in profile.all_issues() {
        let text = issue.to_lowercase();
        if encoded.iter().any(|e| e.text == text) {
            continue;
        }

        let embedding = embedder.encode(&text)?;
        encoded.push(EncodedIssue { text, embedding });
    }

    Ok(encoded)
}

/// Lexical check: the issue appears verbatim in the contraindications text
///
/// Both arguments must already be lower-cased.
#[inline]
pub fn matches_lexically(contraindications_lower: &str, issue_lower: &str) -> bool {
    contraindications_lower.contains(issue_lower)
}

/// Check whether a posture is unsafe for any of the user's issues
///
/// An issue excludes the posture if it is a case-insensitive substring of the
/// contraindications text, or if its similarity to the contraindications
/// embedding strictly exceeds `threshold`. Evaluation stops at the first
/// issue that triggers. No issues means no exclusion.
pub fn is_contraindicated(
    posture: &PostureRecord,
    issues: &[EncodedIssue],
    threshold: f32,
) -> bool {
    if issues.is_empty() {
        return false;
    }

    let contraindications = posture.contraindications_lower();

    issues.iter().any(|issue| {
        if matches_lexically(contraindications, &issue.text) {
            tracing::debug!("Excluding {}: '{}' listed in contraindications", posture.name, issue.text);
            return true;
        }

        let similarity = issue.embedding.similarity(&posture.contraindications_emb);
        if exceeds_threshold(similarity, threshold) {
            tracing::debug!(
                "Excluding {}: '{}' similar to contraindications ({:.3})",
                posture.name,
                issue.text,
                similarity
            );
            return true;
        }

        false
    })
}
