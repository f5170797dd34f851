//! Knowledge-base lookups: summary, endpoint search, workflows, refresh.

use std::sync::Arc;

use api_knowledge::{EndpointMatch, KnowledgeSummary, Workflow};
use axum::extract::{Path, Query, State};
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::knowledge::knowledge_request::EndpointQuery,
};

/// Handler: GET /knowledge/summary
pub async fn summary_route(State(state): State<Arc<AppState>>) -> ApiResponse<KnowledgeSummary> {
    ApiResponse::success(state.knowledge.summary().await)
}

/// Handler: GET /knowledge/endpoints?query=contract
pub async fn search_endpoints_route(
    State(state): State<Arc<AppState>>,
    Query(q): Query<EndpointQuery>,
) -> ApiResponse<Vec<EndpointMatch>> {
    ApiResponse::success(state.knowledge.search_endpoints(&q.query).await)
}

/// Handler: GET /knowledge/workflows/{category}
pub async fn workflow_route(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> AppResult<ApiResponse<Workflow>> {
    state
        .knowledge
        .workflow(&category)
        .await
        .map(ApiResponse::success)
        .ok_or_else(|| AppError::NotFound(format!("workflow `{category}`")))
}

/// Handler: POST /knowledge/refresh
///
/// Drops both cache files and rebuilds. Already seeded API documents in the
/// vector store are not replaced.
pub async fn refresh_route(State(state): State<Arc<AppState>>) -> ApiResponse<KnowledgeSummary> {
    let kb = state.knowledge.refresh().await;
    info!(endpoints = kb.endpoints.len(), fallback = kb.is_fallback(), "knowledge base refreshed via API");
    ApiResponse::success(state.knowledge.summary().await)
}
