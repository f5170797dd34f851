//! GET /capabilities, GET /capabilities/{name}

use axum::extract::Path;
use feasibility::{Capability, capabilities::CAPABILITIES, get_capability_info};

use crate::{
    core::http::response_envelope::ApiResponse,
    error_handler::{AppError, AppResult},
};

pub async fn list_capabilities_route() -> ApiResponse<&'static [Capability]> {
    ApiResponse::success(CAPABILITIES)
}

pub async fn capability_route(Path(name): Path<String>) -> AppResult<ApiResponse<&'static Capability>> {
    get_capability_info(&name)
        .map(ApiResponse::success)
        .ok_or_else(|| AppError::NotFound(format!("capability `{name}`")))
}
