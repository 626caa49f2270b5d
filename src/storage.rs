//! The vector store: a persisted document collection with cosine retrieval

use crate::config::{DimensionPolicy, StoreConfig};
use crate::document::{Document, DocumentId, Metadata, ScoredResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::flat_index;
use crate::persistence::SnapshotFile;
use crate::vector::Embedding;
use std::path::Path;
use tracing::{debug, info, warn};

/// Durable, queryable storage of (text, metadata, embedding) triples.
///
/// The whole collection is loaded when the store is opened and rewritten to
/// disk after every insertion. Documents can be added and read but never
/// updated or removed.
///
/// A `VectorStore` assumes it is the only writer of its file. Wrap it in a
/// [`SharedVectorStore`](crate::shared::SharedVectorStore) when several
/// threads need to insert.
#[derive(Debug)]
pub struct VectorStore<P> {
    provider: P,
    file: SnapshotFile,
    documents: Vec<Document>,
    dimension_policy: DimensionPolicy,
    startup_warning: Option<RagError>,
}

impl<P: EmbeddingProvider> VectorStore<P> {
    /// Open the store at `config.path`.
    ///
    /// This never fails: a missing file gives an empty collection, and an
    /// unreadable or corrupt one gives an empty collection plus a warning
    /// available from [`startup_warning`](Self::startup_warning).
    pub fn open(config: StoreConfig, provider: P) -> Self {
        let file = SnapshotFile::new(&config.path);

        let (documents, startup_warning) = match file.load() {
            Ok(Some(documents)) => {
                info!(path = %config.path.display(), count = documents.len(), "loaded collection");
                (documents, None)
            }
            Ok(None) => {
                debug!(path = %config.path.display(), "no collection file, starting empty");
                (Vec::new(), None)
            }
            Err(e) => {
                warn!(error = %e, "could not load collection, starting empty");
                (Vec::new(), Some(e))
            }
        };

        Self {
            provider,
            file,
            documents,
            dimension_policy: config.dimension_policy,
            startup_warning,
        }
    }

    /// Embed `text` and append it to the collection.
    ///
    /// Returns `EmbeddingFailure` without touching the collection if the
    /// provider yields no vector. Returns `PersistenceFailure` (carrying the
    /// new id) if the document was added in memory but the file write failed.
    pub fn store(&mut self, text: impl Into<String>, metadata: Metadata) -> Result<DocumentId> {
        let text = text.into();
        let embedding = embed_with(&self.provider, &text)?;
        self.store_with_embedding(text, metadata, embedding)
    }

    /// Append a document whose embedding was computed elsewhere, then persist.
    ///
    /// An empty embedding, or one with a NaN or infinite component, is
    /// rejected as `EmbeddingFailure`.
    pub fn store_with_embedding(
        &mut self,
        text: impl Into<String>,
        metadata: Metadata,
        embedding: Embedding,
    ) -> Result<DocumentId> {
        if embedding.is_empty() || !embedding.is_finite() {
            warn!(dimension = embedding.dimension(), "rejecting unusable embedding");
            return Err(RagError::EmbeddingFailure);
        }

        let doc = Document::new(text.into(), metadata, embedding);
        let id = doc.id.clone();
        self.documents.push(doc);
        debug!(id = %id, count = self.documents.len(), "stored document");

        if let Err(e) = self.file.save(&self.documents) {
            warn!(id = %id, error = %e, "document kept in memory but not persisted");
            return Err(RagError::PersistenceFailure {
                id,
                path: self.file.path().to_path_buf(),
                reason: e.to_string(),
            });
        }

        Ok(id)
    }

    /// Return up to `top_n` documents ranked by cosine similarity to `query`.
    ///
    /// An empty collection (or `top_n == 0`) returns no results without
    /// calling the provider. If the provider fails on the query this also
    /// returns an empty list and logs a warning; use
    /// [`try_retrieve`](Self::try_retrieve) to observe that case as an error.
    pub fn retrieve(&self, query: &str, top_n: usize) -> Result<Vec<ScoredResult>> {
        match self.try_retrieve(query, top_n) {
            Err(RagError::EmbeddingFailure) => {
                warn!(provider = self.provider.name(), "query embedding failed, returning no results");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Like [`retrieve`](Self::retrieve), but reports a provider failure as
    /// `EmbeddingFailure`.
    pub fn try_retrieve(&self, query: &str, top_n: usize) -> Result<Vec<ScoredResult>> {
        if self.documents.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let query = embed_with(&self.provider, query)?;
        self.search_by_embedding(&query, top_n)
    }

    /// Rank the collection against a precomputed query embedding.
    ///
    /// A query with a NaN or infinite component is `EmbeddingFailure`.
    pub fn search_by_embedding(&self, query: &Embedding, top_n: usize) -> Result<Vec<ScoredResult>> {
        if !query.is_finite() {
            return Err(RagError::EmbeddingFailure);
        }
        let ranked = flat_index::rank(&self.documents, query, top_n, self.dimension_policy)?;
        debug!(results = ranked.len(), "ranked collection");

        Ok(ranked
            .into_iter()
            .map(|(position, score)| ScoredResult::from_document(&self.documents[position], score))
            .collect())
    }

    pub(crate) fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P> VectorStore<P> {
    /// Get the number of documents in the store
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All documents in insertion order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Look up a document by id.
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| &d.id == id)
    }

    /// Dimension of the first stored embedding, if any.
    pub fn dimension(&self) -> Option<usize> {
        self.documents.first().map(|d| d.embedding.dimension())
    }

    /// Location of the collection file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn dimension_policy(&self) -> DimensionPolicy {
        self.dimension_policy
    }

    /// The problem encountered while loading the collection file, if any.
    pub fn startup_warning(&self) -> Option<&RagError> {
        self.startup_warning.as_ref()
    }
}

/// Run the provider and map "no vector" to `EmbeddingFailure`.
///
/// A vector with a NaN or infinite component counts as no vector.
pub(crate) fn embed_with<P: EmbeddingProvider + ?Sized>(provider: &P, text: &str) -> Result<Embedding> {
    match provider.embed(text) {
        Some(embedding) if !embedding.is_empty() && embedding.is_finite() => Ok(embedding),
        Some(embedding) if !embedding.is_empty() => {
            warn!(provider = provider.name(), text_len = text.len(), "embedding provider returned non-finite values");
            Err(RagError::EmbeddingFailure)
        }
        _ => {
            warn!(provider = provider.name(), text_len = text.len(), "embedding provider returned no vector");
            Err(RagError::EmbeddingFailure)
        }
    }
}
