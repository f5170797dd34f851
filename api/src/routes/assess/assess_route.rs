//! POST /assess, POST /assess/email, GET /history

use std::sync::Arc;
use std::time::Instant;

use axum::{Json, extract::State, http::HeaderMap};
use feasibility::{format_for_email, generate_response, summary_export};
use tracing::{debug, info};

use crate::{
    core::{
        app_state::{AppState, HistoryEntry},
        http::response_envelope::ApiResponse,
    },
    error_handler::{AppError, AppResult},
    routes::{
        assess::assess_request::{AssessRequest, AssessResponse, EmailResponse},
        request_id,
    },
};

fn question_of(body: &AssessRequest) -> AppResult<String> {
    let q = body.question.trim();
    if q.is_empty() {
        return Err(AppError::BadRequest("question must not be empty".into()));
    }
    Ok(q.to_string())
}

/// Handler: POST /assess
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/assess \
///   -H 'content-type: application/json' \
///   -d '{"question":"Can we attach a PDF to a contract?","mode":"auto"}'
/// ```
pub async fn assess_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<AssessRequest>,
) -> AppResult<ApiResponse<AssessResponse>> {
    let question = question_of(&body)?;
    let mode = body.mode.unwrap_or(state.default_mode);
    let request_id = request_id(&headers);
    debug!(request_id = %request_id, mode = mode.as_str(), "assess_route: start");

    let started = Instant::now();
    let assessment = state.manager.assess(&question, mode).await;
    let response = generate_response(&assessment, &question);
    let summary = summary_export(&assessment, &question);
    state.push_history(&question, &response).await;

    info!(
        request_id = %request_id,
        engine = ?assessment.engine,
        feasibility = %assessment.feasibility,
        fallback = assessment.fallback_used,
        latency_ms = started.elapsed().as_millis() as u64,
        "assess_route: done"
    );

    Ok(ApiResponse::success(AssessResponse {
        question,
        mode,
        assessment,
        response,
        summary,
    }))
}

/// Handler: POST /assess/email
pub async fn assess_email_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AssessRequest>,
) -> AppResult<ApiResponse<EmailResponse>> {
    let question = question_of(&body)?;
    let mode = body.mode.unwrap_or(state.default_mode);
    let assessment = state.manager.assess(&question, mode).await;
    let body = format_for_email(&assessment, &question);
    Ok(ApiResponse::success(EmailResponse { question, body }))
}

/// Handler: GET /history
pub async fn history_route(State(state): State<Arc<AppState>>) -> ApiResponse<Vec<HistoryEntry>> {
    ApiResponse::success(state.history.read().await.clone())
}
