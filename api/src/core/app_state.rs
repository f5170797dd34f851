//! Services built once at start-up and shared by every handler.

use std::path::PathBuf;
use std::sync::Arc;

use ai_llm_service::{LlmRole, LlmServiceProfiles, ProfileChat};
use api_knowledge::ApiKnowledge;
use chrono::{DateTime, Utc};
use feasibility::{AnalyzerManager, EngineMode, HybridConfig, HybridEngine, SimpleEngine};
use rag_store::{
    EmbeddingsProvider, HashingEmbedder, MemoryStore, OpenAiEmbedder, QdrantStore, RagConfig,
    VectorStore,
};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error_handler::{AppError, AppResult};

/// One answered question, kept in memory for `GET /history`.
#[derive(Clone, Debug, Serialize)]
pub struct HistoryEntry {
    pub question: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub knowledge: Arc<ApiKnowledge>,
    pub manager: AnalyzerManager,
    pub default_mode: EngineMode,
    /// Folder read by `POST /documents/load_folder` when the body names none.
    pub docs_dir: PathBuf,
    /// Unbounded and lost on restart.
    pub history: RwLock<Vec<HistoryEntry>>,
}

impl AppState {
    pub fn new(
        knowledge: Arc<ApiKnowledge>,
        manager: AnalyzerManager,
        default_mode: EngineMode,
        docs_dir: PathBuf,
    ) -> Self {
        Self {
            knowledge,
            manager,
            default_mode,
            docs_dir,
            history: RwLock::new(Vec::new()),
        }
    }

    /// Builds every service from the environment.
    ///
    /// The knowledge base and the simple engine always come up. The hybrid
    /// engine is skipped, with the reason kept for the status endpoint, when
    /// the vector store cannot be reached or seeded.
    pub async fn from_env() -> AppResult<Self> {
        let llm = Arc::new(LlmServiceProfiles::from_env()?);
        let knowledge = Arc::new(ApiKnowledge::from_env().await?);

        let simple = Arc::new(SimpleEngine::new(Arc::new(ProfileChat::new(
            llm.clone(),
            LlmRole::Quick,
        ))));
        let mut manager = AnalyzerManager::new(simple).with_llm(llm.clone());

        match build_hybrid(llm.clone(), &knowledge).await {
            Ok(h) => {
                info!(backend = h.store_backend(), "hybrid engine ready");
                manager = manager.with_hybrid(Arc::new(h));
            }
            Err(e) => {
                warn!(error = %e, "hybrid engine unavailable, simple engine only");
                manager = manager.without_hybrid(e.to_string());
            }
        }

        let default_mode = match std::env::var("DEFAULT_ENGINE") {
            Ok(v) => EngineMode::parse(&v)
                .ok_or_else(|| AppError::Config(format!("DEFAULT_ENGINE: unknown mode `{v}`")))?,
            Err(_) => EngineMode::default(),
        };
        let docs_dir = std::env::var("INTEGRATION_DOCS_DIR")
            .unwrap_or_else(|_| "./integration_documents".into())
            .into();

        Ok(Self::new(knowledge, manager, default_mode, docs_dir))
    }

    pub async fn push_history(&self, question: &str, response: &str) {
        self.history.write().await.push(HistoryEntry {
            question: question.to_string(),
            response: response.to_string(),
            timestamp: Utc::now(),
        });
    }
}

/// `VECTOR_BACKEND=qdrant` (default) or `memory`.
async fn build_store(llm: Arc<LlmServiceProfiles>) -> AppResult<Arc<dyn VectorStore>> {
    let cfg = RagConfig::from_env();
    cfg.validate()?;
    let backend = std::env::var("VECTOR_BACKEND").unwrap_or_else(|_| "qdrant".into());

    match backend.trim().to_ascii_lowercase().as_str() {
        "qdrant" => {
            let embedder: Arc<dyn EmbeddingsProvider> =
                Arc::new(OpenAiEmbedder::new(llm, cfg.vector_size));
            Ok(Arc::new(QdrantStore::connect(cfg, embedder).await?))
        }
        "memory" => {
            // without a key the OpenAI embedder cannot seed anything
            let embedder: Arc<dyn EmbeddingsProvider> =
                if llm.profile(LlmRole::Embedding).api_key.is_some() {
                    Arc::new(OpenAiEmbedder::new(llm, cfg.vector_size))
                } else {
                    Arc::new(HashingEmbedder::new(cfg.vector_size))
                };
            Ok(Arc::new(MemoryStore::new(embedder)))
        }
        other => Err(AppError::Config(format!("VECTOR_BACKEND: unknown backend `{other}`"))),
    }
}

async fn build_hybrid(llm: Arc<LlmServiceProfiles>, knowledge: &ApiKnowledge) -> AppResult<HybridEngine> {
    let store = build_store(llm.clone()).await?;
    let chat = Arc::new(ProfileChat::new(llm, LlmRole::Deep));
    let engine = HybridEngine::new(store, chat, HybridConfig::from_env());
    let seeded = engine.initialize(&*knowledge.knowledge_base().await).await?;
    if !seeded.seeded.is_empty() {
        info!(collections = ?seeded.seeded, "seeded empty collections");
    }
    Ok(engine)
}
