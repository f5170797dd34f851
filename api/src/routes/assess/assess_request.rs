use feasibility::{Assessment, EngineMode, SummaryExport};
use serde::{Deserialize, Serialize};

/// Request payload for `/assess` and `/assess/email`.
#[derive(Debug, Deserialize)]
pub struct AssessRequest {
    /// Sales question in plain language.
    pub question: String,
    /// Engine strategy; the server default when omitted.
    #[serde(default)]
    pub mode: Option<EngineMode>,
}

#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub question: String,
    pub mode: EngineMode,
    pub assessment: Assessment,
    /// Markdown answer for the chat surface.
    pub response: String,
    pub summary: SummaryExport,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub question: String,
    pub body: String,
}
