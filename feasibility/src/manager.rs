//! Engine selection between the simple and hybrid strategies.

use std::collections::BTreeMap;
use std::sync::Arc;

use ai_llm_service::{HealthStatus, LlmServiceProfiles};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assessment::Assessment;
use crate::engine::AssessmentEngine;
use crate::hybrid::HybridEngine;
use crate::simple_engine::SimpleEngine;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    #[default]
    Hybrid,
    Simple,
    Auto,
}

impl EngineMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Some(Self::Hybrid),
            "simple" => Some(Self::Simple),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hybrid => "hybrid",
            Self::Simple => "simple",
            Self::Auto => "auto",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SystemStatus {
    pub simple_available: bool,
    pub hybrid_available: bool,
    pub recommended_mode: EngineMode,
    pub store_backend: Option<&'static str>,
    pub collection_stats: BTreeMap<String, u64>,
    pub total_documents: u64,
    /// Why the hybrid engine is missing or its stats could not be read.
    pub error: Option<String>,
    pub llm_health: Vec<HealthStatus>,
}

pub struct AnalyzerManager {
    simple: Arc<SimpleEngine>,
    hybrid: Option<Arc<HybridEngine>>,
    hybrid_error: Option<String>,
    llm: Option<Arc<LlmServiceProfiles>>,
}

impl AnalyzerManager {
    pub fn new(simple: Arc<SimpleEngine>) -> Self {
        Self {
            simple,
            hybrid: None,
            hybrid_error: None,
            llm: None,
        }
    }

    pub fn with_hybrid(mut self, hybrid: Arc<HybridEngine>) -> Self {
        self.hybrid = Some(hybrid);
        self.hybrid_error = None;
        self
    }

    /// Records why no hybrid engine could be built.
    pub fn without_hybrid(mut self, reason: impl Into<String>) -> Self {
        self.hybrid = None;
        self.hybrid_error = Some(reason.into());
        self
    }

    pub fn with_llm(mut self, llm: Arc<LlmServiceProfiles>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn hybrid(&self) -> Option<&Arc<HybridEngine>> {
        self.hybrid.as_ref()
    }

    pub fn hybrid_available(&self) -> bool {
        self.hybrid.is_some()
    }

    /// `Hybrid` falls back to the simple engine when the hybrid run itself
    /// fell back; `Auto` only checks availability.
    pub async fn assess(&self, question: &str, mode: EngineMode) -> Assessment {
        match (mode, &self.hybrid) {
            (EngineMode::Simple, _) | (_, None) => {
                if mode != EngineMode::Simple {
                    info!(mode = mode.as_str(), "hybrid engine unavailable, using simple engine");
                }
                AssessmentEngine::assess(self.simple.as_ref(), question).await
            }
            (EngineMode::Hybrid, Some(h)) => {
                let a = AssessmentEngine::assess(h.as_ref(), question).await;
                if a.fallback_used {
                    warn!("hybrid engine fell back, retrying with simple engine");
                    AssessmentEngine::assess(self.simple.as_ref(), question).await
                } else {
                    a
                }
            }
            (EngineMode::Auto, Some(h)) => AssessmentEngine::assess(h.as_ref(), question).await,
        }
    }

    pub async fn system_status(&self) -> SystemStatus {
        let mut error = self.hybrid_error.clone();
        let mut collection_stats = BTreeMap::new();
        if let Some(h) = &self.hybrid {
            match h.collection_stats().await {
                Ok(s) => collection_stats = s,
                Err(e) => {
                    warn!(error = %e, "collection stats unavailable");
                    error = Some(e.to_string());
                }
            }
        }
        let llm_health = match &self.llm {
            Some(llm) => llm.health_all().await,
            None => Vec::new(),
        };

        SystemStatus {
            simple_available: true,
            hybrid_available: self.hybrid.is_some(),
            recommended_mode: if self.hybrid.is_some() {
                EngineMode::Hybrid
            } else {
                EngineMode::Simple
            },
            store_backend: self.hybrid.as_ref().map(|h| h.store_backend()),
            total_documents: collection_stats.values().sum(),
            collection_stats,
            error,
            llm_health,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{EngineKind, Feasibility};
    use crate::hybrid::tests::seeded_engine;
    use crate::simple_engine::tests::ScriptedChat;

    const HYBRID_REPLY: &str = r#"{"feasibility": "YES", "confidence": 0.9, "explanation": "Supported."}"#;

    fn simple() -> Arc<SimpleEngine> {
        Arc::new(SimpleEngine::new(Arc::new(ScriptedChat::failing())))
    }

    #[test]
    fn mode_parsing() {
        assert_eq!(EngineMode::parse(" AUTO "), Some(EngineMode::Auto));
        assert_eq!(EngineMode::parse("fast"), None);
        assert_eq!(EngineMode::default(), EngineMode::Hybrid);
    }

    #[tokio::test]
    async fn simple_only_manager() {
        let m = AnalyzerManager::new(simple()).without_hybrid("qdrant unreachable");
        let a = m.assess("Can we attach a PDF?", EngineMode::Hybrid).await;
        assert_eq!(a.engine, EngineKind::Simple);

        let s = m.system_status().await;
        assert!(s.simple_available);
        assert!(!s.hybrid_available);
        assert_eq!(s.recommended_mode, EngineMode::Simple);
        assert_eq!(s.total_documents, 0);
        assert_eq!(s.error.as_deref(), Some("qdrant unreachable"));
    }

    #[tokio::test]
    async fn hybrid_mode_uses_hybrid_answer() {
        let (h, _) = seeded_engine(ScriptedChat::replying(HYBRID_REPLY)).await;
        let m = AnalyzerManager::new(simple()).with_hybrid(Arc::new(h));
        let a = m.assess("Create a contract via the API", EngineMode::Hybrid).await;
        assert_eq!(a.engine, EngineKind::Hybrid);
        assert_eq!(a.feasibility, Feasibility::Yes);

        let a = m.assess("Create a contract via the API", EngineMode::Simple).await;
        assert_eq!(a.engine, EngineKind::Simple);

        let s = m.system_status().await;
        assert_eq!(s.recommended_mode, EngineMode::Hybrid);
        assert_eq!(s.total_documents, 12);
        assert_eq!(s.store_backend, Some("memory"));
    }

    #[tokio::test]
    async fn hybrid_fallback_is_replaced_in_hybrid_mode_only() {
        let (h, _) = seeded_engine(ScriptedChat::failing()).await;
        let m = AnalyzerManager::new(simple()).with_hybrid(Arc::new(h));

        let a = m.assess("Create a contract from a template", EngineMode::Hybrid).await;
        assert_eq!(a.engine, EngineKind::Simple);
        assert_eq!(a.feasibility, Feasibility::Yes);

        let a = m.assess("Create a contract from a template", EngineMode::Auto).await;
        assert_eq!(a.engine, EngineKind::Hybrid);
        assert_eq!(a.feasibility, Feasibility::NeedsAnalysis);
    }
}
