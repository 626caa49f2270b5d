//! # RAG Store
//!
//! A small persisted embedding store for retrieval-augmented generation.
//!
//! This library provides:
//! - A document collection (text + metadata + embedding) persisted as one JSON file
//! - Cosine-similarity retrieval with stable tie ordering
//! - A pluggable embedding provider interface with offline and Gemini backends
//! - A lock-protected handle for multi-threaded writers
//!
//! ## Example
//!
//! ```rust
//! use rag_store::{HashEmbedder, Metadata, StoreConfig, VectorStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = StoreConfig::new(dir.path().join("rag_store.json"));
//! let mut store = VectorStore::open(config, HashEmbedder::default());
//!
//! // Store a note
//! let id = store
//!     .store("The user prefers deep coding tasks in the morning.", Metadata::new())
//!     .unwrap();
//! assert!(store.get(&id).is_some());
//!
//! // Retrieve the closest notes
//! let results = store.retrieve("When does the user like to code?", 3).unwrap();
//! assert_eq!(results.len(), 1);
//! ```

pub mod config;
pub mod distance;
pub mod document;
pub mod embedding;
pub mod error;
pub mod flat_index;
pub mod metrics;
pub mod persistence;
pub mod server;
pub mod shared;
pub mod storage;
pub mod vector;

pub use config::{DimensionPolicy, StoreConfig, DEFAULT_TOP_N};
pub use document::{Document, DocumentId, Metadata, ScoredResult};
pub use embedding::{EmbeddingProvider, FnEmbedder, HashEmbedder};
pub use error::{RagError, Result};
pub use metrics::MetricsCollector;
pub use shared::SharedVectorStore;
pub use storage::VectorStore;
pub use vector::Embedding;

#[cfg(feature = "gemini")]
pub use embedding::GeminiEmbedder;
