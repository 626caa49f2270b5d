//! Brute-force ranking: O(n) cosine scoring over every stored document

use crate::config::DimensionPolicy;
use crate::distance::cosine_similarity;
use crate::document::Document;
use crate::error::{RagError, Result};
use crate::vector::Embedding;
use std::cmp::Ordering;
use tracing::warn;

/// Score every document against `query` and return the best `k` as
/// `(position, score)` pairs, sorted by score descending.
///
/// Equal scores keep insertion order. Documents whose embedding dimension
/// differs from the query are handled according to `policy`.
pub fn rank(
    documents: &[Document],
    query: &Embedding,
    k: usize,
    policy: DimensionPolicy,
) -> Result<Vec<(usize, f64)>> {
    let mut results = Vec::with_capacity(documents.len());
    let mut skipped = 0usize;

    for (position, doc) in documents.iter().enumerate() {
        match cosine_similarity(query, &doc.embedding) {
            Ok(score) => results.push((position, score)),
            Err(RagError::DimensionMismatch { expected, actual }) => match policy {
                DimensionPolicy::Skip => {
                    skipped += 1;
                    warn!(
                        id = %doc.id,
                        query_dimension = expected,
                        document_dimension = actual,
                        "skipping document with mismatched embedding dimension"
                    );
                }
                DimensionPolicy::Fail => {
                    return Err(RagError::DimensionMismatch { expected, actual });
                }
            },
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        warn!(skipped, "documents excluded from ranking");
    }

    // sort_by is stable: ties stay in insertion order
    results.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    results.truncate(k);
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentId, Metadata};
    use approx::assert_relative_eq;

    fn doc(id: &str, embedding: Vec<f64>) -> Document {
        Document {
            id: DocumentId::from(id),
            text: id.to_string(),
            metadata: Metadata::new(),
            embedding: Embedding::new(embedding),
        }
    }

    #[test]
    fn test_rank_basic() {
        let docs = vec![
            doc("a", vec![1.0, 0.0]),
            doc("b", vec![0.0, 1.0]),
            doc("c", vec![0.9, 0.1]),
        ];
        let query = Embedding::new(vec![1.0, 0.0]);
        let results = rank(&docs, &query, 3, DimensionPolicy::Skip).unwrap();

        let order: Vec<usize> = results.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![0, 2, 1]);
        assert_relative_eq!(results[0].1, 1.0, epsilon = 1e-6);
        assert_relative_eq!(results[1].1, 0.993_883_7, epsilon = 1e-5);
        assert_relative_eq!(results[2].1, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let docs = vec![
            doc("first", vec![2.0, 0.0]),
            doc("second", vec![1.0, 0.0]),
            doc("third", vec![5.0, 0.0]),
        ];
        let query = Embedding::new(vec![1.0, 0.0]);
        let results = rank(&docs, &query, 3, DimensionPolicy::Skip).unwrap();
        let order: Vec<usize> = results.iter().map(|(p, _)| *p).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_truncates_to_k() {
        let docs: Vec<Document> = (0..10).map(|i| doc(&i.to_string(), vec![i as f64, 1.0])).collect();
        let query = Embedding::new(vec![1.0, 1.0]);
        assert_eq!(rank(&docs, &query, 4, DimensionPolicy::Skip).unwrap().len(), 4);
        assert_eq!(rank(&docs, &query, 50, DimensionPolicy::Skip).unwrap().len(), 10);
    }

    #[test]
    fn test_skip_policy_drops_mismatched() {
        let docs = vec![doc("short", vec![1.0]), doc("ok", vec![1.0, 0.0])];
        let query = Embedding::new(vec![1.0, 0.0]);
        let results = rank(&docs, &query, 3, DimensionPolicy::Skip).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 1);
    }

    #[test]
    fn test_fail_policy_errors() {
        let docs = vec![doc("ok", vec![1.0, 0.0]), doc("long", vec![1.0, 0.0, 0.0])];
        let query = Embedding::new(vec![1.0, 0.0]);
        assert!(matches!(
            rank(&docs, &query, 3, DimensionPolicy::Fail),
            Err(RagError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }
}
