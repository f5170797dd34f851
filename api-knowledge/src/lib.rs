//! OneFlow API knowledge base.
//!
//! Downloads the public OpenAPI document, flattens it into `"METHOD path"`
//! endpoint records with heuristic categories and call ordering, and caches
//! both the raw document and the derived JSON under a cache directory.
//!
//! Resolution order in [`ApiKnowledge::load`]:
//! 1. a fresh `knowledge_base.json`;
//! 2. a rebuild from a new download (the raw text is cached);
//! 3. a rebuild from the cached raw text;
//! 4. the single-endpoint fallback, which is never persisted.

pub mod cache;
pub mod config;
pub mod errors;
pub mod extract;
pub mod fetcher;
pub mod model;
pub mod workflows;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub use config::KnowledgeConfig;
pub use errors::{KnowledgeError, KnowledgeResult};
pub use fetcher::{HttpSpecFetcher, SpecFetcher};
pub use model::{
    EndpointMatch, EndpointRecord, HttpMethod, KnowledgeBase, KnowledgeSummary, Workflow,
    WorkflowCategory,
};

/// Shared handle over the current knowledge-base snapshot.
pub struct ApiKnowledge {
    cfg: KnowledgeConfig,
    fetcher: Arc<dyn SpecFetcher>,
    kb: RwLock<Arc<KnowledgeBase>>,
}

impl ApiKnowledge {
    /// Loads (or builds) the knowledge base. Never fails: the worst case is
    /// the fallback snapshot.
    pub async fn load(cfg: KnowledgeConfig, fetcher: Arc<dyn SpecFetcher>) -> Self {
        let kb = load_or_create(&cfg, fetcher.as_ref()).await;
        Self {
            cfg,
            fetcher,
            kb: RwLock::new(Arc::new(kb)),
        }
    }

    /// Env-configured instance backed by [`HttpSpecFetcher`].
    pub async fn from_env() -> KnowledgeResult<Self> {
        let cfg = KnowledgeConfig::from_env();
        cfg.validate()?;
        let fetcher = HttpSpecFetcher::new(Duration::from_secs(cfg.fetch_timeout_secs))?;
        Ok(Self::load(cfg, Arc::new(fetcher)).await)
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.cfg
    }

    /// Current snapshot.
    pub async fn knowledge_base(&self) -> Arc<KnowledgeBase> {
        self.kb.read().await.clone()
    }

    /// Deletes both cache files and rebuilds from scratch.
    pub async fn refresh(&self) -> Arc<KnowledgeBase> {
        cache::remove_if_exists(&self.cfg.knowledge_base_file()).await;
        cache::remove_if_exists(&self.cfg.spec_file()).await;

        let fresh = Arc::new(create_knowledge_base(&self.cfg, self.fetcher.as_ref()).await);
        *self.kb.write().await = fresh.clone();
        info!(
            endpoints = fresh.endpoints.len(),
            fallback = fresh.is_fallback(),
            "knowledge base refreshed"
        );
        fresh
    }

    /// Case-insensitive substring match over summary, description and path.
    pub async fn search_endpoints(&self, query: &str) -> Vec<EndpointMatch> {
        let q = query.to_lowercase();
        let kb = self.knowledge_base().await;
        kb.endpoints
            .iter()
            .filter(|(_, e)| {
                e.summary.to_lowercase().contains(&q)
                    || e.description.to_lowercase().contains(&q)
                    || e.path.to_lowercase().contains(&q)
            })
            .map(|(k, e)| EndpointMatch {
                endpoint: k.clone(),
                info: e.clone(),
            })
            .collect()
    }

    pub async fn workflow(&self, category: &str) -> Option<Workflow> {
        self.knowledge_base().await.workflows.get(category).cloned()
    }

    pub async fn summary(&self) -> KnowledgeSummary {
        let kb = self.knowledge_base().await;
        KnowledgeSummary {
            endpoint_count: kb.endpoints.len(),
            workflow_count: kb.workflows.len(),
            schema_count: kb.schemas.len(),
            api_version: kb.metadata.api_version.clone(),
            title: kb.metadata.title.clone(),
            created_at: kb.metadata.created_at,
            fallback: kb.is_fallback(),
        }
    }
}

async fn load_or_create(cfg: &KnowledgeConfig, fetcher: &dyn SpecFetcher) -> KnowledgeBase {
    let kb_file = cfg.knowledge_base_file();
    let max_age = Duration::from_secs(cfg.refresh_hours.saturating_mul(3600));

    if !cache::is_stale(&kb_file, max_age).await {
        if let Some(kb) = cache::load_knowledge_base(&kb_file).await {
            info!(endpoints = kb.endpoints.len(), "using cached knowledge base");
            return kb;
        }
    }
    create_knowledge_base(cfg, fetcher).await
}

async fn create_knowledge_base(cfg: &KnowledgeConfig, fetcher: &dyn SpecFetcher) -> KnowledgeBase {
    let Some(spec) = specification(cfg, fetcher).await else {
        warn!("no specification available, using fallback knowledge base");
        return workflows::fallback_knowledge_base();
    };

    let kb = extract::build_knowledge_base(&spec, Utc::now());
    if let Err(e) = cache::save_knowledge_base(&cfg.knowledge_base_file(), &kb).await {
        warn!(error = %e, "could not persist knowledge base");
    }
    info!(
        endpoints = kb.endpoints.len(),
        api_version = %kb.metadata.api_version,
        "knowledge base built"
    );
    kb
}

/// Fresh download when possible, cached raw text otherwise.
async fn specification(cfg: &KnowledgeConfig, fetcher: &dyn SpecFetcher) -> Option<serde_json::Value> {
    let spec_file = cfg.spec_file();

    match fetcher.fetch(&cfg.spec_url).await {
        Ok(text) => match extract::parse_spec(&text) {
            Ok(spec) => {
                if let Err(e) = cache::write_spec(&spec_file, &text).await {
                    warn!(error = %e, "could not cache specification");
                }
                return Some(spec);
            }
            Err(e) => warn!(error = %e, "downloaded specification is not valid YAML"),
        },
        Err(e) => warn!(url = %cfg.spec_url, error = %e, "could not download specification"),
    }

    let text = match cache::read_spec(&spec_file).await {
        Ok(t) => t,
        Err(_) => return None,
    };
    match extract::parse_spec(&text) {
        Ok(spec) => {
            info!(path = %spec_file.display(), "using cached specification");
            Some(spec)
        }
        Err(e) => {
            warn!(error = %e, "cached specification is not valid YAML");
            None
        }
    }
}
