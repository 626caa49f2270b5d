//! Offline feature-hashing embedder.

use super::EmbeddingProvider;
use crate::vector::Embedding;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic bag-of-words embedder.
///
/// Each lowercase alphanumeric token is hashed with FNV-1a into one of
/// `dimensions` buckets with a hash-derived sign, then the vector is
/// L2-normalized. Texts sharing words score higher than unrelated ones,
/// which is enough for local use without a network model.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub const DEFAULT_DIMENSIONS: usize = 256;

    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSIONS)
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

impl EmbeddingProvider for HashEmbedder {
    fn name(&self) -> &str {
        "hash"
    }

    fn embed(&self, text: &str) -> Option<Embedding> {
        if self.dimensions == 0 {
            return None;
        }

        let mut data = vec![0.0f64; self.dimensions];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            data[bucket] += sign;
        }

        let norm = data.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for x in &mut data {
                *x /= norm;
            }
        }

        Some(Embedding::new(data))
    }
}
