//! Retrieval-augmented engine over the five document collections.
//!
//! A question is routed by keyword intent to its two most likely collections,
//! widened with a thin pass over all collections, merged with per-source caps
//! and handed as context to the deep model. Anything that goes wrong on that
//! path ends in a fixed NEEDS_ANALYSIS assessment instead of an error.

mod ingest;
mod intent;
mod prompt;
mod search;
mod seed;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::ChatCompletion;
use api_knowledge::KnowledgeBase;
use rag_store::{Collection, SearchResult, VectorStore};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assessment::{Feasibility, HybridAssessment};
use crate::cfg::HybridConfig;
use crate::error::{FeasibilityError, FeasibilityResult};

pub use ingest::{INGESTED_SOURCE_TYPE, IngestDocument, IngestReport, target_collection};
pub use intent::{analyze_intent, top_collections};
pub use prompt::build_context;
pub use search::merge_results;
pub use seed::{endpoint_complexity, endpoint_content};

/// Collections filled during [`HybridEngine::initialize`], with document counts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub seeded: BTreeMap<String, usize>,
}

pub struct HybridEngine {
    store: Arc<dyn VectorStore>,
    chat: Arc<dyn ChatCompletion>,
    cfg: HybridConfig,
}

impl HybridEngine {
    pub fn new(store: Arc<dyn VectorStore>, chat: Arc<dyn ChatCompletion>, cfg: HybridConfig) -> Self {
        Self { store, chat, cfg }
    }

    pub fn config(&self) -> &HybridConfig {
        &self.cfg
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Seeds every empty collection. Non-empty ones are left untouched, so a
    /// restart against a persistent store does not duplicate the seed corpus.
    pub async fn initialize(&self, kb: &KnowledgeBase) -> FeasibilityResult<SeedReport> {
        let mut report = SeedReport::default();
        for c in Collection::ALL {
            let existing = self.store.count(c).await?;
            if existing > 0 {
                debug!(collection = %c, existing, "collection already populated");
                continue;
            }
            let docs = seed::seed_documents(c, kb);
            let added = self.store.add_documents(c, docs).await?;
            info!(collection = %c, added, "collection seeded");
            report.seeded.insert(c.name().to_string(), added);
        }
        Ok(report)
    }

    pub async fn hybrid_search(&self, question: &str) -> Vec<SearchResult> {
        search::hybrid_search(self.store.as_ref(), question, &self.cfg).await
    }

    /// Never fails; see [`fallback_assessment`].
    pub async fn assess(&self, question: &str) -> HybridAssessment {
        let started = Instant::now();
        match self.try_assess(question).await {
            Ok(a) => {
                info!(
                    model = %self.chat.model_name(),
                    sources = a.sources.len(),
                    feasibility = %a.feasibility,
                    latency_ms = started.elapsed().as_millis() as u64,
                    "hybrid assessment"
                );
                a
            }
            Err(e) => {
                warn!(error = %e, "hybrid assessment failed, returning fallback");
                fallback_assessment(&e.to_string())
            }
        }
    }

    async fn try_assess(&self, question: &str) -> FeasibilityResult<HybridAssessment> {
        let results = self.hybrid_search(question).await;
        if results.is_empty() {
            return Err(FeasibilityError::NoResults);
        }

        let context = prompt::build_context(&results);
        let system = prompt::system_prompt(&context, question);
        let user = prompt::user_prompt(&context, question);
        let reply = self.chat.complete(Some(&system), &user).await?;
        prompt::parse_reply(&reply, results)
    }

    /// Appends documents to their collections. Duplicates are stored again.
    pub async fn add_integration_documents(
        &self,
        docs: &[IngestDocument],
    ) -> FeasibilityResult<IngestReport> {
        let mut report = IngestReport::default();
        for (c, batch) in ingest::route(docs) {
            let added = self.store.add_documents(c, batch).await?;
            report.added += added;
            report.by_collection.insert(c.name().to_string(), added);
        }
        info!(added = report.added, "integration documents ingested");
        Ok(report)
    }

    /// Document count per collection name.
    pub async fn collection_stats(&self) -> FeasibilityResult<BTreeMap<String, u64>> {
        let mut stats = BTreeMap::new();
        for c in Collection::ALL {
            stats.insert(c.name().to_string(), self.store.count(c).await?);
        }
        Ok(stats)
    }
}

/// Canned result for a failed hybrid run.
pub fn fallback_assessment(error: &str) -> HybridAssessment {
    HybridAssessment {
        feasibility: Feasibility::NeedsAnalysis,
        confidence: 0.3,
        explanation: format!("Could not complete enhanced analysis. {error}"),
        api_requirements: vec!["Manual review required".into()],
        integration_complexity: "UNKNOWN - requires detailed analysis".into(),
        business_context: "Unable to determine without proper analysis".into(),
        caveats: vec![
            "Enhanced analysis system unavailable".into(),
            "Fallback assessment provided".into(),
        ],
        related_endpoints: Vec::new(),
        integration_patterns: Vec::new(),
        implementation_steps: vec!["Contact technical team for detailed assessment".into()],
        timeline_estimate: String::new(),
        cost_implications: String::new(),
        sources: Vec::new(),
        fallback_used: true,
    }
}
