//! Assessment schemas.
//!
//! The simple engine speaks [`FeasibilityReport`] (categorical confidence),
//! the hybrid engine [`HybridAssessment`] (0..1 score with sources). Both
//! convert into the shared [`Assessment`] that the formatter and the HTTP
//! layer consume.

use std::fmt;

use rag_store::SearchResult;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Business-impact text the model returns when it has nothing specific to say.
pub const DEFAULT_BUSINESS_IMPACT: &str = "Standard implementation considerations apply";

/// Verdict. Parsing is case-insensitive; unknown values read as `Conditional`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feasibility {
    Yes,
    No,
    Conditional,
    NeedsAnalysis,
}

impl Feasibility {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "YES" => Some(Self::Yes),
            "NO" => Some(Self::No),
            "CONDITIONAL" => Some(Self::Conditional),
            "NEEDS_ANALYSIS" => Some(Self::NeedsAnalysis),
            _ => None,
        }
    }

    /// Wire form: `YES`, `NO`, `CONDITIONAL`, `NEEDS_ANALYSIS`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Conditional => "CONDITIONAL",
            Self::NeedsAnalysis => "NEEDS_ANALYSIS",
        }
    }

    /// Human form used by the simple schema and the formatter.
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Conditional => "Conditional",
            Self::NeedsAnalysis => "Needs analysis",
        }
    }
}

impl fmt::Display for Feasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Feasibility {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Feasibility {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(v.as_str().and_then(Self::parse).unwrap_or(Self::Conditional))
    }
}

fn serialize_label<S: Serializer>(f: &Feasibility, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(f.label())
}

/// Categorical confidence of the simple engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ConfidenceLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Score used when a categorical result is shown next to hybrid ones.
    pub fn score(self) -> f32 {
        match self {
            Self::High => 0.9,
            Self::Medium => 0.6,
            Self::Low => 0.3,
        }
    }

    pub fn from_score(score: f32) -> Self {
        if score >= 0.75 {
            Self::High
        } else if score >= 0.45 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Labels parse case-insensitively; numbers (or numeric strings) go through
/// [`ConfidenceLevel::from_score`]. Anything else reads as `Medium`.
impl<'de> Deserialize<'de> for ConfidenceLevel {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(d)?;
        let level = match &v {
            Value::String(s) => Self::parse(s).or_else(|| score_of(&v).map(Self::from_score)),
            Value::Number(_) => score_of(&v).map(Self::from_score),
            _ => None,
        };
        Ok(level.unwrap_or_default())
    }
}

/// Either a category or a 0..1 score; serialised untagged.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Confidence {
    Level(ConfidenceLevel),
    Score(f32),
}

impl Confidence {
    pub fn score(self) -> f32 {
        match self {
            Self::Level(l) => l.score(),
            Self::Score(s) => s,
        }
    }

    pub fn level(self) -> ConfidenceLevel {
        match self {
            Self::Level(l) => l,
            Self::Score(s) => ConfidenceLevel::from_score(s),
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(l) => f.write_str(l.as_str()),
            Self::Score(s) => write!(f, "{:.0}%", s * 100.0),
        }
    }
}

/// Canned sentence explaining a confidence level.
pub fn confidence_reasoning(level: ConfidenceLevel, caveats: usize) -> String {
    match level {
        ConfidenceLevel::High => {
            "Standard OneFlow capability with well-documented implementation path".to_string()
        }
        ConfidenceLevel::Low => {
            format!("Complex implementation with {caveats} important considerations")
        }
        ConfidenceLevel::Medium => {
            format!("Feasible with {caveats} key requirements that need attention")
        }
    }
}

/// Number or numeric string (`"80%"` allowed), percentages scaled into `0..=1`.
fn score_of(v: &Value) -> Option<f32> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    }?;
    let n = if n > 1.0 { n / 100.0 } else { n };
    Some((n as f32).clamp(0.0, 1.0))
}

/// Strings pass through, numbers and booleans are stringified, and `null` or
/// structured values yield `None`.
fn text_of(v: Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_or<'de, D: Deserializer<'de>>(d: D, fallback: fn() -> String) -> Result<String, D::Error> {
    Ok(text_of(Value::deserialize(d)?).unwrap_or_else(fallback))
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    text_or(d, String::new)
}

/// Arrays keep their scalar items, a bare string becomes a one-item list,
/// anything else is empty.
fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(text_of)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Value::deserialize(d)?.as_bool().unwrap_or(false))
}

fn default_conditional() -> Feasibility {
    Feasibility::Conditional
}

fn default_quick_answer() -> String {
    "Technical assessment completed".to_string()
}

fn default_business_impact() -> String {
    DEFAULT_BUSINESS_IMPACT.to_string()
}

fn quick_answer_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    text_or(d, default_quick_answer)
}

fn business_impact_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    text_or(d, default_business_impact)
}

/// Simple-engine result. Every field has a default, and `null` or mistyped
/// values read as that default, so a partial model reply still yields a
/// complete report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    #[serde(default = "default_conditional", serialize_with = "serialize_label")]
    pub feasibility: Feasibility,
    #[serde(default)]
    pub confidence: ConfidenceLevel,
    #[serde(default = "default_quick_answer", deserialize_with = "quick_answer_or_default")]
    pub quick_answer: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub capabilities_used: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub important_caveats: Vec<String>,
    #[serde(default = "default_business_impact", deserialize_with = "business_impact_or_default")]
    pub business_impact: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub related_features: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub follow_up_questions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub confidence_reasoning: String,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub fallback_used: bool,
}

fn default_score() -> f32 {
    0.5
}

fn default_explanation() -> String {
    "Assessment completed".to_string()
}

fn default_integration_complexity() -> String {
    "MEDIUM".to_string()
}

fn default_business_context() -> String {
    "Standard integration scenario".to_string()
}

fn explanation_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    text_or(d, default_explanation)
}

fn complexity_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    text_or(d, default_integration_complexity)
}

fn business_context_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    text_or(d, default_business_context)
}

/// Accepts a number or a numeric string; clamps into `0..=1`.
fn lenient_score<'de, D: Deserializer<'de>>(d: D) -> Result<f32, D::Error> {
    Ok(score_of(&Value::deserialize(d)?).unwrap_or_else(default_score))
}

/// Hybrid-engine result, shaped like the JSON object the model is asked for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HybridAssessment {
    #[serde(default = "default_conditional")]
    pub feasibility: Feasibility,
    #[serde(default = "default_score", deserialize_with = "lenient_score")]
    pub confidence: f32,
    #[serde(default = "default_explanation", deserialize_with = "explanation_or_default")]
    pub explanation: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub api_requirements: Vec<String>,
    #[serde(default = "default_integration_complexity", deserialize_with = "complexity_or_default")]
    pub integration_complexity: String,
    #[serde(default = "default_business_context", deserialize_with = "business_context_or_default")]
    pub business_context: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub caveats: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub related_endpoints: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub integration_patterns: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub implementation_steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub timeline_estimate: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cost_implications: String,
    /// Retrieved context; never taken from the model reply.
    #[serde(default, skip_deserializing)]
    pub sources: Vec<SearchResult>,
    /// Set only on the canned NEEDS_ANALYSIS result.
    #[serde(skip)]
    pub fallback_used: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Simple,
    Hybrid,
}

/// Engine-independent assessment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assessment {
    pub engine: EngineKind,
    pub feasibility: Feasibility,
    pub confidence: Confidence,
    pub quick_answer: String,
    pub confidence_reasoning: String,
    pub capabilities_used: Vec<String>,
    pub caveats: Vec<String>,
    pub business_impact: String,
    pub related_features: Vec<String>,
    pub follow_up_questions: Vec<String>,
    pub api_requirements: Vec<String>,
    pub integration_complexity: String,
    pub related_endpoints: Vec<String>,
    pub integration_patterns: Vec<String>,
    pub implementation_steps: Vec<String>,
    pub timeline_estimate: String,
    pub cost_implications: String,
    pub sources: Vec<SearchResult>,
    pub fallback_used: bool,
}

impl From<FeasibilityReport> for Assessment {
    fn from(r: FeasibilityReport) -> Self {
        Self {
            engine: EngineKind::Simple,
            feasibility: r.feasibility,
            confidence: Confidence::Level(r.confidence),
            quick_answer: r.quick_answer,
            confidence_reasoning: r.confidence_reasoning,
            capabilities_used: r.capabilities_used,
            caveats: r.important_caveats,
            business_impact: r.business_impact,
            related_features: r.related_features,
            follow_up_questions: r.follow_up_questions,
            api_requirements: Vec::new(),
            integration_complexity: String::new(),
            related_endpoints: Vec::new(),
            integration_patterns: Vec::new(),
            implementation_steps: Vec::new(),
            timeline_estimate: String::new(),
            cost_implications: String::new(),
            sources: Vec::new(),
            fallback_used: r.fallback_used,
        }
    }
}

impl From<HybridAssessment> for Assessment {
    fn from(h: HybridAssessment) -> Self {
        let confidence = Confidence::Score(h.confidence);
        Self {
            engine: EngineKind::Hybrid,
            feasibility: h.feasibility,
            confidence,
            quick_answer: h.explanation,
            confidence_reasoning: confidence_reasoning(confidence.level(), h.caveats.len()),
            capabilities_used: Vec::new(),
            caveats: h.caveats,
            business_impact: h.business_context,
            related_features: Vec::new(),
            follow_up_questions: Vec::new(),
            api_requirements: h.api_requirements,
            integration_complexity: h.integration_complexity,
            related_endpoints: h.related_endpoints,
            integration_patterns: h.integration_patterns,
            implementation_steps: h.implementation_steps,
            timeline_estimate: h.timeline_estimate,
            cost_implications: h.cost_implications,
            sources: h.sources,
            fallback_used: h.fallback_used,
        }
    }
}
