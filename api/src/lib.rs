//! HTTP surface of the feasibility service.
//!
//! Every response uses the `{success, data, error}` envelope. Services are
//! built once in [`AppState::from_env`] and shared through `State<Arc<AppState>>`.

use std::{env, sync::Arc};

mod core;
mod error_handler;
mod middleware_layer;
mod routes;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::app_state::{AppState, HistoryEntry};
pub use crate::error_handler::{AppError, AppResult};

use crate::middleware_layer::json_extractor::json_error_mapper;
use crate::routes::{
    assess::assess_route::{assess_email_route, assess_route, history_route},
    capabilities_route::{capability_route, list_capabilities_route},
    documents::documents_route::{ingest_route, load_folder_route},
    knowledge::knowledge_route::{refresh_route, search_endpoints_route, summary_route, workflow_route},
    system_status_route::system_status_route,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/assess", post(assess_route))
        .route("/assess/email", post(assess_email_route))
        .route("/history", get(history_route))
        .route("/capabilities", get(list_capabilities_route))
        .route("/capabilities/{name}", get(capability_route))
        .route("/knowledge/summary", get(summary_route))
        .route("/knowledge/endpoints", get(search_endpoints_route))
        .route("/knowledge/workflows/{category}", get(workflow_route))
        .route("/knowledge/refresh", post(refresh_route))
        .route("/documents", post(ingest_route))
        .route("/documents/load_folder", post(load_folder_route))
        .route("/system_status", get(system_status_route))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Builds the state from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".into());

    let state = Arc::new(AppState::from_env().await?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "feasibility API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::path::PathBuf;
    use std::pin::Pin;

    use ai_llm_service::error_handler::{Provider, ProviderError, ProviderErrorKind};
    use ai_llm_service::{AiLlmError, ChatCompletion, ChatFuture};
    use api_knowledge::{ApiKnowledge, KnowledgeConfig, KnowledgeError, KnowledgeResult, SpecFetcher};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use feasibility::{AnalyzerManager, EngineMode, HybridConfig, HybridEngine, SimpleEngine};
    use rag_store::{HashingEmbedder, MemoryStore};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct OfflineFetcher;

    impl SpecFetcher for OfflineFetcher {
        fn fetch<'a>(
            &'a self,
            _url: &'a str,
        ) -> Pin<Box<dyn Future<Output = KnowledgeResult<String>> + Send + 'a>> {
            Box::pin(async { Err(KnowledgeError::Io(std::io::Error::other("offline"))) })
        }
    }

    /// Fixed reply, or a provider error when `None`.
    struct CannedChat(Option<&'static str>);

    impl ChatCompletion for CannedChat {
        fn complete<'a>(&'a self, _system: Option<&'a str>, _prompt: &'a str) -> ChatFuture<'a> {
            let out = self.0.map(str::to_string).ok_or_else(|| {
                AiLlmError::Provider(ProviderError::new(Provider::OpenAI, ProviderErrorKind::MissingApiKey))
            });
            Box::pin(async move { out })
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    const HYBRID_REPLY: &str = r#"{"feasibility": "YES", "confidence": 0.8, "explanation": "Files can be attached after creation.", "caveats": ["Template must allow attachments"]}"#;

    async fn state(dir: &tempfile::TempDir, with_hybrid: bool) -> Arc<AppState> {
        let knowledge = Arc::new(
            ApiKnowledge::load(KnowledgeConfig::new_default(dir.path()), Arc::new(OfflineFetcher)).await,
        );
        let simple = Arc::new(SimpleEngine::new(Arc::new(CannedChat(None))));
        let mut manager = AnalyzerManager::new(simple);
        if with_hybrid {
            let store = Arc::new(MemoryStore::new(Arc::new(HashingEmbedder::new(64))));
            let engine = HybridEngine::new(store, Arc::new(CannedChat(Some(HYBRID_REPLY))), HybridConfig::default());
            engine.initialize(&*knowledge.knowledge_base().await).await.unwrap();
            manager = manager.with_hybrid(Arc::new(engine));
        } else {
            manager = manager.without_hybrid("no vector store in this test");
        }
        Arc::new(AppState::new(
            knowledge,
            manager,
            EngineMode::Hybrid,
            PathBuf::from("./does-not-exist"),
        ))
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(v) => {
                req = req.header("content-type", "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };
        let res = app.oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn assess_answers_and_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(&dir, true).await;

        let (status, v) = call(
            router(st.clone()),
            "POST",
            "/assess",
            Some(json!({ "question": "Can we attach a PDF to a contract?" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["assessment"]["engine"], "hybrid");
        assert_eq!(v["data"]["summary"]["assessment_method"], "AI-Powered");
        assert!(v["data"]["response"].as_str().unwrap().starts_with("**✅ Quick Answer: Yes**"));

        let (_, v) = call(router(st), "GET", "/history", None).await;
        assert_eq!(v["data"].as_array().unwrap().len(), 1);
        assert_eq!(v["data"][0]["question"], "Can we attach a PDF to a contract?");
    }

    #[tokio::test]
    async fn simple_mode_and_email() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(&dir, false).await;

        let (status, v) = call(
            router(st),
            "POST",
            "/assess/email",
            Some(json!({ "question": "Create a contract from a template", "mode": "simple" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = v["data"]["body"].as_str().unwrap();
        assert!(body.contains("Assessment: Yes (Confidence: High)"));
        assert!(body.contains("Assessment Method: Fallback"));
    }

    #[tokio::test]
    async fn bad_requests_use_the_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(&dir, false).await;

        let (status, v) = call(router(st.clone()), "POST", "/assess", Some(json!({ "question": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "BAD_REQUEST");

        let (status, v) = call(router(st), "POST", "/assess", Some(json!({ "mode": "auto" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(v["error"]["code"], "UNPROCESSABLE_ENTITY");
        assert_eq!(v["error"]["details"][0]["path"], "question");
    }

    #[tokio::test]
    async fn catalog_and_knowledge_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(&dir, false).await;

        let (_, v) = call(router(st.clone()), "GET", "/capabilities", None).await;
        assert_eq!(v["data"].as_array().unwrap().len(), 8);

        let (status, v) = call(router(st.clone()), "GET", "/capabilities/file_management", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["data"]["name"], "file_management");

        let (status, _) = call(router(st.clone()), "GET", "/capabilities/teleportation", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, v) = call(router(st.clone()), "GET", "/knowledge/summary", None).await;
        assert_eq!(v["data"]["fallback"], true);

        let (_, v) = call(router(st.clone()), "GET", "/knowledge/endpoints?query=ACCOUNT", None).await;
        assert_eq!(v["data"][0]["endpoint"], "GET /accounts/me");

        let (status, v) = call(router(st.clone()), "GET", "/knowledge/workflows/webhook_integration", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(v["data"]["endpoints_sequence"].is_array());

        let (status, _) = call(router(st), "GET", "/knowledge/workflows/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ingestion_requires_hybrid_engine() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(&dir, false).await;
        let (status, v) = call(
            router(st.clone()),
            "POST",
            "/documents",
            Some(json!({ "documents": [{ "content": "Bulk import guide", "type": "api" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(v["error"]["code"], "HYBRID_UNAVAILABLE");

        let (_, v) = call(router(st), "GET", "/system_status", None).await;
        assert_eq!(v["data"]["hybrid_available"], false);
        assert_eq!(v["data"]["recommended_mode"], "simple");
        assert_eq!(v["data"]["error"], "no vector store in this test");
    }

    #[tokio::test]
    async fn documents_and_folder_ingestion() {
        let dir = tempfile::tempdir().unwrap();
        let st = state(&dir, true).await;

        let (status, v) = call(
            router(st.clone()),
            "POST",
            "/documents",
            Some(json!({ "documents": [{ "content": "Bulk import endpoint accepts CSV files.", "type": "api" }] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["data"]["ingest"]["by_collection"]["api_specifications"], 1);
        assert_eq!(v["data"]["collection_stats"]["api_specifications"], 2);

        let docs = tempfile::tempdir().unwrap();
        std::fs::write(
            docs.path().join("glossary_terms.md"),
            "Glossary of OneFlow terms: a party is a legal entity in a contract.",
        )
        .unwrap();
        let (status, v) = call(
            router(st.clone()),
            "POST",
            "/documents/load_folder",
            Some(json!({ "folder": docs.path() })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["data"]["summary"]["total"], 1);
        assert_eq!(v["data"]["ingest"]["by_collection"]["glossary_concepts"], 1);
        assert_eq!(v["data"]["collection_stats"]["glossary_concepts"], 6);

        let (status, v) = call(router(st), "POST", "/documents/load_folder", Some(json!({}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(v["error"]["code"], "NOT_FOUND");
    }
}
