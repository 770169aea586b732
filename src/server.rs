//! HTTP search service.
//!
//! `GET /api/customers/search?query=<q>&limit=<n>` runs the matcher against
//! the shared store. Store faults become `500` with an error body and never an
//! empty list. A missing `query` or a non-integer `limit` is rejected by the
//! extractor with `400`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use custsearch_core::{CustomerStore, Matcher, SearchPage, StoreError};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

/// Shared per-process state. Read-only, so no locking.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CustomerStore>,
    pub matcher: Matcher,
}

impl AppState {
    pub fn new(store: Arc<dyn CustomerStore>, matcher: Matcher) -> Self {
        Self { store, matcher }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub limit: Option<i64>,
}

/// Failure body: `{ "error": "<message>" }`.
#[derive(Debug)]
pub struct ApiError(StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "search failed");
        let body = serde_json::json!({ "error": "An error occurred while searching customers" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/customers/search", get(search_customers))
        .route("/health", get(health))
        .with_state(state)
}

async fn search_customers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchPage>, ApiError> {
    let started = Instant::now();
    let page = state
        .matcher
        .search(state.store.as_ref(), &params.query, params.limit)?;

    tracing::info!(
        query = %params.query,
        total_count = page.total_count,
        returned = page.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "customer search"
    );
    Ok(Json(page))
}

async fn health() -> &'static str {
    "ok"
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "search service listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
