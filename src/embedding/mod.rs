//! Embedding providers: turn text into vectors for similarity search.
//!
//! The store only sees the [`EmbeddingProvider`] trait. A provider signals
//! failure by returning `None` (an empty vector is treated the same way), so
//! transport errors never cross this boundary as panics or foreign error types.

pub mod hash;

#[cfg(feature = "gemini")]
pub mod gemini;

use crate::vector::Embedding;
use std::sync::Arc;

pub use hash::HashEmbedder;

#[cfg(feature = "gemini")]
pub use gemini::GeminiEmbedder;

/// A capability that converts text into an embedding.
///
/// Implementations should produce vectors of a fixed dimension for a given
/// model version so that scores stay comparable across documents.
pub trait EmbeddingProvider {
    /// Short identifier used in log output.
    fn name(&self) -> &str {
        "custom"
    }

    /// Embed `text`, or return `None` if no vector could be produced.
    fn embed(&self, text: &str) -> Option<Embedding>;
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn embed(&self, text: &str) -> Option<Embedding> {
        (**self).embed(text)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn embed(&self, text: &str) -> Option<Embedding> {
        (**self).embed(text)
    }
}

impl<P: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn embed(&self, text: &str) -> Option<Embedding> {
        (**self).embed(text)
    }
}

/// Adapts a closure into an [`EmbeddingProvider`].
///
/// ```rust
/// use rag_store::embedding::{EmbeddingProvider, FnEmbedder};
///
/// let provider = FnEmbedder::new(|text: &str| Some(vec![text.len() as f64, 1.0]));
/// assert_eq!(provider.embed("abc").unwrap().as_slice(), &[3.0, 1.0]);
/// ```
pub struct FnEmbedder<F> {
    f: F,
}

impl<F> FnEmbedder<F>
where
    F: Fn(&str) -> Option<Vec<f64>>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EmbeddingProvider for FnEmbedder<F>
where
    F: Fn(&str) -> Option<Vec<f64>>,
{
    fn name(&self) -> &str {
        "fn"
    }

    fn embed(&self, text: &str) -> Option<Embedding> {
        (self.f)(text).map(Embedding::new)
    }
}
