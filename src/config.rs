//! Store configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Number of results returned when the caller does not ask for a specific count.
pub const DEFAULT_TOP_N: usize = 3;

/// What to do when a stored embedding's dimension differs from the query's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionPolicy {
    /// Leave the document out of the ranking and log a warning.
    #[default]
    Skip,
    /// Fail the whole retrieval with `DimensionMismatch`.
    Fail,
}

/// Configuration for a [`VectorStore`](crate::storage::VectorStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Location of the collection file. The parent directory is created on first write.
    pub path: PathBuf,
    #[serde(default)]
    pub dimension_policy: DimensionPolicy,
}

impl StoreConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            dimension_policy: DimensionPolicy::default(),
        }
    }

    pub fn with_dimension_policy(mut self, policy: DimensionPolicy) -> Self {
        self.dimension_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new("data/rag_store.json");
        assert_eq!(config.path, PathBuf::from("data/rag_store.json"));
        assert_eq!(config.dimension_policy, DimensionPolicy::Skip);
    }

    #[test]
    fn test_policy_from_json() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"path":"a.json","dimension_policy":"fail"}"#).unwrap();
        assert_eq!(config.dimension_policy, DimensionPolicy::Fail);

        let config: StoreConfig = serde_json::from_str(r#"{"path":"a.json"}"#).unwrap();
        assert_eq!(config.dimension_policy, DimensionPolicy::Skip);
    }
}
