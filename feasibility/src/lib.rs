//! Feasibility assessment for sales questions about the OneFlow API.
//!
//! Two engines answer the same question:
//! - [`SimpleEngine`]: one quick-model call primed with the capability
//!   catalog, keyword rules when the model is unreachable;
//! - [`HybridEngine`]: intent-routed retrieval over five document
//!   collections, then one deep-model call over the retrieved context.
//!
//! [`AnalyzerManager`] picks between them and [`formatter`] turns the shared
//! [`Assessment`] into sales-facing text.

pub mod assessment;
pub mod capabilities;
pub mod cfg;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod hybrid;
pub mod manager;
pub mod simple_engine;

pub use assessment::{
    Assessment, Confidence, ConfidenceLevel, EngineKind, Feasibility, FeasibilityReport, HybridAssessment,
};
pub use capabilities::{Capability, get_capability_info, list_capabilities};
pub use cfg::HybridConfig;
pub use engine::{AssessFuture, AssessmentEngine};
pub use error::{FeasibilityError, FeasibilityResult};
pub use formatter::{SummaryExport, error_response, format_for_email, generate_response, summary_export};
pub use hybrid::{HybridEngine, IngestDocument, IngestReport, SeedReport};
pub use manager::{AnalyzerManager, EngineMode, SystemStatus};
pub use simple_engine::SimpleEngine;
