//! Gemini embedding provider over the Generative Language REST API.
//!
//! Only available with the `gemini` feature. Uses a blocking `reqwest` client,
//! so do not call it directly from inside an async task.

use super::EmbeddingProvider;
use crate::vector::Embedding;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "text-embedding-004";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DOCUMENT_TITLE: &str = "Embedding of text";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedRequest<'a> {
    model: String,
    content: Content<'a>,
    task_type: &'static str,
    title: &'static str,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Values,
}

#[derive(Deserialize)]
struct Values {
    values: Vec<f64>,
}

/// [`EmbeddingProvider`] backed by Gemini's `embedContent` endpoint.
pub struct GeminiEmbedder {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEmbedder {
    /// Create a provider for the default `text-embedding-004` model.
    pub fn new(api_key: impl Into<String>) -> reqwest::Result<Self> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, text: &str) -> reqwest::Result<Vec<f64>> {
        let url = format!("{}/models/{}:embedContent", self.base_url, self.model);
        let body = EmbedRequest {
            model: format!("models/{}", self.model),
            content: Content {
                parts: [Part { text }],
            },
            task_type: "RETRIEVAL_DOCUMENT",
            title: DOCUMENT_TITLE,
        };

        let response: EmbedResponse = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        Ok(response.embedding.values)
    }
}

impl EmbeddingProvider for GeminiEmbedder {
    fn name(&self) -> &str {
        "gemini"
    }

    fn embed(&self, text: &str) -> Option<Embedding> {
        debug!(provider = "gemini", model = %self.model, text_len = text.len(), "embedding text");
        match self.request(text) {
            Ok(values) if !values.is_empty() => Some(Embedding::new(values)),
            Ok(_) => {
                warn!(provider = "gemini", "embedding response contained no values");
                None
            }
            Err(e) => {
                warn!(provider = "gemini", error = %e, "embedding request failed");
                None
            }
        }
    }
}
