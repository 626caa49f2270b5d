//! HTTP route handlers for the RAG store API.

use crate::config::DEFAULT_TOP_N;
use crate::document::{Metadata, ScoredResult};
use crate::embedding::EmbeddingProvider;
use crate::error::RagError;
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

// --- Request/Response types ---

#[derive(Deserialize)]
pub struct StoreRequest {
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Serialize, Deserialize)]
pub struct StoreResponse {
    pub id: String,
    pub status: String,
}

#[derive(Deserialize)]
pub struct RetrieveRequest {
    pub query: String,
    pub top_n: Option<usize>,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub document_count: usize,
}

#[derive(Serialize, Deserialize)]
pub struct MetricsResponse {
    pub total_stores: u64,
    pub total_retrieves: u64,
    pub embedding_failures: u64,
    pub persistence_failures: u64,
    pub avg_retrieve_latency_us: f64,
    pub p50_retrieve_latency_us: f64,
    pub p95_retrieve_latency_us: f64,
    pub p99_retrieve_latency_us: f64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Set when the document was accepted in memory but not persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            id: None,
        }),
    )
}

fn status_for(err: &RagError) -> StatusCode {
    match err {
        RagError::EmbeddingFailure => StatusCode::UNPROCESSABLE_ENTITY,
        RagError::DimensionMismatch { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// --- Router ---

pub fn create_router<P: EmbeddingProvider + Send + Sync + 'static>(
    state: Arc<AppState<P>>,
) -> Router {
    Router::new()
        .route("/documents", post(store_document::<P>))
        .route("/retrieve", post(retrieve::<P>))
        .route("/health", get(health::<P>))
        .route("/metrics", get(get_metrics::<P>))
        .with_state(state)
}

// --- Handlers ---

async fn store_document<P: EmbeddingProvider + Send + Sync + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Json(req): Json<StoreRequest>,
) -> Result<(StatusCode, Json<StoreResponse>), ApiError> {
    // Embedding providers block on network I/O.
    let worker = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || worker.store.store(req.text, req.metadata))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    match outcome {
        Ok(id) => {
            if let Ok(mut metrics) = state.metrics.write() {
                metrics.record_store();
            }
            Ok((
                StatusCode::CREATED,
                Json(StoreResponse {
                    id: id.to_string(),
                    status: "stored".to_string(),
                }),
            ))
        }
        Err(e) => {
            if let Ok(mut metrics) = state.metrics.write() {
                match e {
                    RagError::EmbeddingFailure => metrics.record_embedding_failure(),
                    RagError::PersistenceFailure { .. } => metrics.record_persistence_failure(),
                    _ => {}
                }
            }
            error!(error = %e, "store request failed");
            let id = e.document_id().map(|id| id.to_string());
            Err((
                status_for(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                    id,
                }),
            ))
        }
    }
}

async fn retrieve<P: EmbeddingProvider + Send + Sync + 'static>(
    State(state): State<Arc<AppState<P>>>,
    Json(req): Json<RetrieveRequest>,
) -> Result<Json<Vec<ScoredResult>>, ApiError> {
    let top_n = req.top_n.unwrap_or(DEFAULT_TOP_N);
    let start = Instant::now();

    let worker = Arc::clone(&state);
    let results = tokio::task::spawn_blocking(move || worker.store.retrieve(&req.query, top_n))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?
        .map_err(|e| api_error(status_for(&e), e))?;

    let elapsed = start.elapsed();

    if let Ok(mut metrics) = state.metrics.write() {
        metrics.record_retrieve(elapsed);
    }

    Ok(Json(results))
}

async fn health<P: EmbeddingProvider + Send + Sync + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Json<HealthResponse> {
    let count = state.store.len().unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        document_count: count,
    })
}

async fn get_metrics<P: EmbeddingProvider + Send + Sync + 'static>(
    State(state): State<Arc<AppState<P>>>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let metrics = state
        .metrics
        .read()
        .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "Lock poisoned"))?;

    Ok(Json(MetricsResponse {
        total_stores: metrics.total_stores(),
        total_retrieves: metrics.total_retrieves(),
        embedding_failures: metrics.embedding_failures(),
        persistence_failures: metrics.persistence_failures(),
        avg_retrieve_latency_us: metrics.avg_retrieve_latency_us(),
        p50_retrieve_latency_us: metrics.percentile_retrieve_latency_us(50.0),
        p95_retrieve_latency_us: metrics.percentile_retrieve_latency_us(95.0),
        p99_retrieve_latency_us: metrics.percentile_retrieve_latency_us(99.0),
    }))
}
