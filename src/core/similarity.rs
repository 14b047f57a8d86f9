/// Cosine similarity between two vectors
///
/// # Arguments
/// * `a` - First vector
/// * `b` - Second vector
///
/// # Returns
/// Similarity in [-1, 1], or 0.0 when either vector has zero norm or the
/// lengths differ
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let norms = norm_a.sqrt() * norm_b.sqrt();
    if norms <= f32::EPSILON {
        return 0.0;
    }

    dot / norms
}

/// Strict threshold check: a similarity equal to the threshold does not exceed it
#[inline]
pub fn exceeds_threshold(similarity: f32, threshold: f32) -> bool {
    similarity > threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let v = [0.6, 0.8, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_opposite_vectors() {
        let sim = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_exact_quarter_similarity() {
        // Unit vector whose first component is exactly 0.25
        let issue = [0.25, 0.75, 0.5, 0.25, 0.25];
        let contra = [1.0, 0.0, 0.0, 0.0, 0.0];

        assert_eq!(cosine_similarity(&issue, &contra), 0.25);
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!exceeds_threshold(0.25, 0.25));
        assert!(exceeds_threshold(0.2501, 0.25));
        assert!(!exceeds_threshold(-0.9, 0.25));
    }
}
