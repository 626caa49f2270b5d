//! HTTP API server exposing store and retrieve over JSON.

pub mod routes;

use crate::embedding::EmbeddingProvider;
use crate::metrics::MetricsCollector;
use crate::shared::SharedVectorStore;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Shared application state for the HTTP server.
pub struct AppState<P> {
    pub store: SharedVectorStore<P>,
    pub metrics: RwLock<MetricsCollector>,
}

impl<P> AppState<P> {
    pub fn new(store: SharedVectorStore<P>) -> Self {
        Self {
            store,
            metrics: RwLock::new(MetricsCollector::new()),
        }
    }
}

/// Start the HTTP server over the given store.
pub async fn start<P>(addr: &str, store: SharedVectorStore<P>) -> anyhow::Result<()>
where
    P: EmbeddingProvider + Send + Sync + 'static,
{
    let state = Arc::new(AppState::new(store));

    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
