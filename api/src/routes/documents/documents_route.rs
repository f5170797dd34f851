//! POST /documents, POST /documents/load_folder

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use doc_loader::load_documents_from_folder;
use feasibility::{FeasibilityError, HybridEngine, IngestDocument, IngestReport};
use tracing::{info, warn};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::documents::documents_request::{
        IngestRequest, IngestResponse, LoadFolderRequest, LoadFolderResponse,
    },
};

fn hybrid(state: &AppState) -> AppResult<&Arc<HybridEngine>> {
    state
        .manager
        .hybrid()
        .ok_or_else(|| FeasibilityError::HybridUnavailable.into())
}

/// Handler: POST /documents
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/documents \
///   -H 'content-type: application/json' \
///   -d '{"documents":[{"content":"Salesforce sync guide ...","title":"Salesforce","type":"integration"}]}'
/// ```
pub async fn ingest_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IngestRequest>,
) -> AppResult<ApiResponse<IngestResponse>> {
    let engine = hybrid(&state)?;
    if body.documents.iter().any(|d| d.content.trim().is_empty()) {
        return Err(AppError::BadRequest("document content must not be empty".into()));
    }

    let ingest = engine.add_integration_documents(&body.documents).await?;
    let collection_stats = engine.collection_stats().await?;
    Ok(ApiResponse::success(IngestResponse {
        ingest,
        collection_stats,
    }))
}

/// Handler: POST /documents/load_folder
pub async fn load_folder_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoadFolderRequest>,
) -> AppResult<ApiResponse<LoadFolderResponse>> {
    let engine = hybrid(&state)?;
    let folder = body.folder.unwrap_or_else(|| state.docs_dir.clone());

    let path = folder.clone();
    let report = tokio::task::spawn_blocking(move || load_documents_from_folder(&path))
        .await
        .map_err(|e| AppError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "JOIN_ERROR",
            message: format!("Background task failed to complete: {e}"),
        })??;

    if !report.skipped.is_empty() {
        warn!(skipped = report.skipped.len(), folder = %folder.display(), "some files were skipped");
    }

    let ingest = if report.documents.is_empty() {
        IngestReport::default()
    } else {
        let docs: Vec<IngestDocument> = report.documents.iter().map(IngestDocument::from).collect();
        engine.add_integration_documents(&docs).await?
    };
    info!(folder = %folder.display(), loaded = report.summary.total, added = ingest.added, "folder ingested");

    let collection_stats = engine.collection_stats().await?;
    Ok(ApiResponse::success(LoadFolderResponse {
        folder,
        summary: report.summary,
        skipped: report.skipped,
        ingest,
        collection_stats,
    }))
}
