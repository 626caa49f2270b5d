//! Snapshot: save/load the full collection to/from a single JSON file.
//!
//! Every save rewrites the whole file, so each insertion costs O(collection
//! size). That is the scaling limit of this store; switching to incremental
//! writes would change the on-disk format.

use crate::document::Document;
use crate::error::{RagError, Result};
use crate::persistence::serialization;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The durable home of one collection.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "collection".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Load the collection, or return `None` if no file exists yet.
    ///
    /// Unreadable or unparseable content is reported as `CorruptStore`.
    pub fn load(&self) -> Result<Option<Vec<Document>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read(&self.path).map_err(|e| self.corrupt(e.to_string()))?;
        let documents =
            serialization::decode_collection(&data).map_err(|e| self.corrupt(e.to_string()))?;
        Ok(Some(documents))
    }

    /// Write the whole collection, replacing any previous file.
    ///
    /// The data goes to a sibling temp file first and is renamed into place,
    /// so a failed write never truncates the existing collection.
    pub fn save(&self, documents: &[Document]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let data = serialization::encode_collection(documents)?;
        let tmp = self.temp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Check if a collection file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn corrupt(&self, reason: String) -> RagError {
        RagError::CorruptStore {
            path: self.path.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentId, Metadata};
    use crate::vector::Embedding;
    use tempfile::TempDir;

    fn docs() -> Vec<Document> {
        vec![
            Document {
                id: DocumentId::from("v1"),
                text: "one".into(),
                metadata: Metadata::new(),
                embedding: Embedding::new(vec![1.0, 2.0, 3.0]),
            },
            Document {
                id: DocumentId::from("v2"),
                text: "two".into(),
                metadata: Metadata::new(),
                embedding: Embedding::new(vec![4.0, 5.0, 6.0]),
            },
        ]
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("rag_store.json"));

        file.save(&docs()).unwrap();
        assert!(file.exists());

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded, docs());
        assert!(!file.temp_path().exists());
    }

    #[test]
    fn test_load_nonexistent() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("missing.json"));
        assert!(!file.exists());
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("nested/deeper/store.json"));
        file.save(&docs()).unwrap();
        assert_eq!(file.load().unwrap().unwrap().len(), 2);
    }

    #[test]
    fn test_load_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[{\"id\": ").unwrap();

        let file = SnapshotFile::new(&path);
        assert!(matches!(file.load(), Err(RagError::CorruptStore { .. })));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("store.json"));
        file.save(&docs()).unwrap();
        file.save(&docs()[..1]).unwrap();
        assert_eq!(file.load().unwrap().unwrap().len(), 1);
    }
}
