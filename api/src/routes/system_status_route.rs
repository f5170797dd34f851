//! GET /system_status

use std::sync::Arc;

use api_knowledge::KnowledgeSummary;
use axum::extract::State;
use feasibility::{EngineMode, SystemStatus};
use serde::Serialize;

use crate::core::{app_state::AppState, http::response_envelope::ApiResponse};

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub engines: SystemStatus,
    pub default_mode: EngineMode,
    pub knowledge: KnowledgeSummary,
    pub history_len: usize,
}

pub async fn system_status_route(State(state): State<Arc<AppState>>) -> ApiResponse<StatusResponse> {
    ApiResponse::success(StatusResponse {
        engines: state.manager.system_status().await,
        default_mode: state.default_mode,
        knowledge: state.knowledge.summary().await,
        history_len: state.history.read().await.len(),
    })
}
