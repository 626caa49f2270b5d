//! Similarity math for embeddings

use crate::error::{RagError, Result};
use crate::vector::Embedding;

/// Compute cosine similarity between two embeddings.
///
/// Returns 0.0 when either side has zero magnitude. Each side is scaled by
/// its largest component before summing, so large finite values cannot
/// overflow to infinity. The result is clamped to [-1, 1] to absorb floating
/// point drift.
pub fn cosine_similarity(v1: &Embedding, v2: &Embedding) -> Result<f64> {
    if !v1.has_same_dimension(v2) {
        return Err(RagError::DimensionMismatch {
            expected: v1.dimension(),
            actual: v2.dimension(),
        });
    }

    let scale1 = v1.max_abs();
    let scale2 = v2.max_abs();
    if scale1 == 0.0 || scale2 == 0.0 {
        return Ok(0.0);
    }

    let (mut dot, mut sq1, mut sq2) = (0.0f64, 0.0f64, 0.0f64);
    for (a, b) in v1.as_slice().iter().zip(v2.as_slice()) {
        let (a, b) = (a / scale1, b / scale2);
        dot += a * b;
        sq1 += a * a;
        sq2 += b * b;
    }

    let similarity = dot / (sq1.sqrt() * sq2.sqrt());
    Ok(similarity.clamp(-1.0, 1.0))
}

/// Compute dot product of two embeddings
pub fn dot_product(v1: &Embedding, v2: &Embedding) -> f64 {
    v1.as_slice()
        .iter()
        .zip(v2.as_slice().iter())
        .map(|(a, b)| a * b)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dot_product() {
        let v1 = Embedding::new(vec![1.0, 2.0, 3.0]);
        let v2 = Embedding::new(vec![4.0, 5.0, 6.0]);
        assert_relative_eq!(dot_product(&v1, &v2), 32.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_identical() {
        let v = Embedding::new(vec![1.0, 0.0, 0.0]);
        assert_relative_eq!(cosine_similarity(&v, &v).unwrap(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let v1 = Embedding::new(vec![1.0, 0.0, 0.0]);
        let v2 = Embedding::new(vec![0.0, 1.0, 0.0]);
        assert_relative_eq!(cosine_similarity(&v1, &v2).unwrap(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        let v1 = Embedding::new(vec![1.0, 0.0, 0.0]);
        let v2 = Embedding::new(vec![-1.0, 0.0, 0.0]);
        assert_relative_eq!(cosine_similarity(&v1, &v2).unwrap(), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_partial_overlap() {
        let v1 = Embedding::new(vec![1.0, 0.0]);
        let v2 = Embedding::new(vec![0.9, 0.1]);
        assert_relative_eq!(cosine_similarity(&v1, &v2).unwrap(), 0.993_883_7, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = Embedding::new(vec![0.0, 0.0]);
        let v = Embedding::new(vec![0.3, -0.7]);
        assert_eq!(cosine_similarity(&zero, &v).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&v, &zero).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_large_components_keep_their_direction() {
        let big = Embedding::new(vec![1e20, 0.0]);
        let unit = Embedding::new(vec![1.0, 0.0]);
        assert_relative_eq!(cosine_similarity(&big, &unit).unwrap(), 1.0, epsilon = 1e-12);

        let huge = Embedding::new(vec![1e300, 1e300]);
        let diag = Embedding::new(vec![1e-300, 1e-300]);
        assert_relative_eq!(cosine_similarity(&huge, &diag).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let v1 = Embedding::new(vec![1.0, 2.0]);
        let v2 = Embedding::new(vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            cosine_similarity(&v1, &v2),
            Err(RagError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }
}
