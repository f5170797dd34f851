use ai_llm_service::AiLlmError;
use api_knowledge::KnowledgeError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doc_loader::LoaderError;
use feasibility::FeasibilityError;
use rag_store::RagError;
use thiserror::Error;

use crate::core::http::response_envelope::ApiResponse;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Http { status, .. } => *status,
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Http { code, .. } => code,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        ApiResponse::<()>::error(self.error_code(), self.to_string(), Vec::new())
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<AiLlmError> for AppError {
    fn from(err: AiLlmError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<KnowledgeError> for AppError {
    fn from(err: KnowledgeError) -> Self {
        AppError::Http {
            status: StatusCode::BAD_GATEWAY,
            code: "KNOWLEDGE_ERROR",
            message: err.to_string(),
        }
    }
}

impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        AppError::Http {
            status: StatusCode::SERVICE_UNAVAILABLE,
            code: "VECTOR_STORE_ERROR",
            message: err.to_string(),
        }
    }
}

/// A missing folder is the caller's fault; anything else is a server-side read failure.
impl From<LoaderError> for AppError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::FolderNotFound(p) => AppError::NotFound(format!("folder {}", p.display())),
            other => AppError::Http {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: "LOADER_ERROR",
                message: other.to_string(),
            },
        }
    }
}

impl From<FeasibilityError> for AppError {
    fn from(err: FeasibilityError) -> Self {
        match err {
            FeasibilityError::Rag(e) => e.into(),
            FeasibilityError::Knowledge(e) => e.into(),
            FeasibilityError::Loader(e) => e.into(),
            FeasibilityError::HybridUnavailable => AppError::Http {
                status: StatusCode::SERVICE_UNAVAILABLE,
                code: "HYBRID_UNAVAILABLE",
                message: "Hybrid engine is not available; document ingestion is disabled".into(),
            },
            other => AppError::Http {
                status: StatusCode::BAD_GATEWAY,
                code: "ASSESSMENT_ERROR",
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_to_status() {
        let e: AppError = FeasibilityError::HybridUnavailable.into();
        assert_eq!(e.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(e.error_code(), "HYBRID_UNAVAILABLE");

        let e: AppError = LoaderError::FolderNotFound("/nope".into()).into();
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);

        let e: AppError = FeasibilityError::Rag(RagError::Qdrant("down".into())).into();
        assert_eq!(e.error_code(), "VECTOR_STORE_ERROR");
    }
}
