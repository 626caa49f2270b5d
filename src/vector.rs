//! Embedding vector type

use serde::{Deserialize, Serialize};

/// A text embedding in n-dimensional space.
///
/// Serialized as a bare array of floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Embedding {
    data: Vec<f64>,
}

impl Embedding {
    /// Create a new embedding from a Vec<f64>
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Get the dimension of the embedding
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Whether the embedding carries no components at all
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Check if this embedding has the same dimension as another
    pub fn has_same_dimension(&self, other: &Embedding) -> bool {
        self.dimension() == other.dimension()
    }

    /// Whether every component is a finite number.
    ///
    /// NaN and infinities cannot be written to the collection file.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    /// Largest absolute component, 0.0 for an empty or all-zero embedding.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0, |m: f64, x| m.max(x.abs()))
    }

    /// Compute the L2 norm (magnitude) of the embedding.
    ///
    /// Components are scaled by the largest magnitude first so squaring
    /// cannot overflow.
    pub fn norm(&self) -> f64 {
        let scale = self.max_abs();
        if scale == 0.0 || !scale.is_finite() {
            return scale;
        }
        scale * self.data.iter().map(|x| (x / scale).powi(2)).sum::<f64>().sqrt()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.data
    }
}

impl From<Vec<f64>> for Embedding {
    fn from(data: Vec<f64>) -> Self {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_embedding_creation() {
        let v = Embedding::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0]);
        assert!(!v.is_empty());
        assert!(Embedding::default().is_empty());
    }

    #[test]
    fn test_embedding_norm() {
        let v = Embedding::new(vec![3.0, 4.0]);
        assert_relative_eq!(v.norm(), 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_norm_of_large_components_does_not_overflow() {
        let v = Embedding::new(vec![3e200, 4e200]);
        assert_relative_eq!(v.norm(), 5e200, max_relative = 1e-12);
        assert_eq!(Embedding::new(vec![0.0, 0.0]).norm(), 0.0);
    }

    #[test]
    fn test_is_finite() {
        assert!(Embedding::new(vec![1.0, -2.5]).is_finite());
        assert!(!Embedding::new(vec![f64::NAN, 1.0]).is_finite());
        assert!(!Embedding::new(vec![0.0, f64::INFINITY]).is_finite());
        assert!(!Embedding::new(vec![f64::NEG_INFINITY]).is_finite());
    }

    #[test]
    fn test_full_precision_survives_json() {
        let v = Embedding::new(vec![0.012345678901234567, -0.98765432109876]);
        let json = serde_json::to_string(&v).unwrap();
        let back: Embedding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let v = Embedding::new(vec![0.5, -1.25]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[0.5,-1.25]");

        let back: Embedding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
