//! Thread-safe handle for multi-writer use of a [`VectorStore`].

use crate::config::StoreConfig;
use crate::document::{DocumentId, Metadata, ScoredResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::storage::{embed_with, VectorStore};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use tracing::warn;

/// A cloneable, lock-protected [`VectorStore`].
///
/// Embedding runs without holding any lock. The append-and-persist step
/// runs under the write lock, so concurrent `store` calls cannot overwrite
/// each other's rewrite of the collection file. Ranking takes the read lock.
///
/// This only covers threads within one process. Two processes pointing at
/// the same file still race.
pub struct SharedVectorStore<P> {
    provider: Arc<P>,
    inner: Arc<RwLock<VectorStore<Arc<P>>>>,
}

impl<P> Clone for SharedVectorStore<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: EmbeddingProvider> SharedVectorStore<P> {
    pub fn open(config: StoreConfig, provider: P) -> Self {
        Self::new(VectorStore::open(config, Arc::new(provider)))
    }

    pub fn new(store: VectorStore<Arc<P>>) -> Self {
        Self {
            provider: Arc::clone(store.provider()),
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Embed `text` and append it under the write lock.
    pub fn store(&self, text: impl Into<String>, metadata: Metadata) -> Result<DocumentId> {
        let text = text.into();
        let embedding = embed_with(&*self.provider, &text)?;

        let mut store = self.inner.write().map_err(|_| RagError::LockPoisoned)?;
        store.store_with_embedding(text, metadata, embedding)
    }

    /// See [`VectorStore::retrieve`].
    pub fn retrieve(&self, query: &str, top_n: usize) -> Result<Vec<ScoredResult>> {
        match self.try_retrieve(query, top_n) {
            Err(RagError::EmbeddingFailure) => {
                warn!(provider = self.provider.name(), "query embedding failed, returning no results");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// See [`VectorStore::try_retrieve`].
    pub fn try_retrieve(&self, query: &str, top_n: usize) -> Result<Vec<ScoredResult>> {
        if top_n == 0 || self.read()?.is_empty() {
            return Ok(Vec::new());
        }

        let query = embed_with(&*self.provider, query)?;
        self.read()?.search_by_embedding(&query, top_n)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Read access to the underlying store.
    pub fn read(&self) -> Result<RwLockReadGuard<'_, VectorStore<Arc<P>>>> {
        self.inner.read().map_err(|_| RagError::LockPoisoned)
    }
}
