//! Sales-facing rendering of an [`Assessment`]: markdown chat answer,
//! summary export and plain-text email body.

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use crate::assessment::{Assessment, Confidence, ConfidenceLevel, DEFAULT_BUSINESS_IMPACT, Feasibility};

const FALLBACK_NOTE: &str = "*Note: This assessment used fallback analysis. For more detailed evaluation, please ensure OpenAI integration is available.*";

/// Related features and follow-up questions shown at most.
const TOP_N: usize = 3;

/// Sources listed under the hybrid answer.
const MAX_SOURCES: usize = 5;

fn feasibility_icon(f: Feasibility) -> &'static str {
    match f {
        Feasibility::Yes => "✅",
        Feasibility::No => "❌",
        Feasibility::Conditional => "⚠️",
        Feasibility::NeedsAnalysis => "🔍",
    }
}

fn confidence_icon(c: Confidence) -> &'static str {
    match c.level() {
        ConfidenceLevel::High => "🟢",
        ConfidenceLevel::Medium => "🟡",
        ConfidenceLevel::Low => "🔴",
    }
}

fn capability_sentence(name: &str) -> String {
    match name {
        "contract_creation" => "Create contracts from your templates".into(),
        "file_management" => "Upload and manage documents/files".into(),
        "multi_party_contracts" => "Handle contracts with multiple parties and signers".into(),
        "template_management" => "Create and customize contract templates".into(),
        "webhook_integration" => "Set up real-time notifications and integrations".into(),
        "contact_management" => "Manage contact information and party details".into(),
        "contract_publishing" => "Send contracts for review and signing".into(),
        "data_extraction" => "Extract and use data from completed contracts".into(),
        other => format!("Use {}", other.replace('_', " ")),
    }
}

fn feature_name(name: &str) -> String {
    match name {
        "contract_creation" => "Contract Creation".into(),
        "file_management" => "Document Management".into(),
        "multi_party_contracts" => "Multi-Party Workflows".into(),
        "template_management" => "Template Customization".into(),
        "webhook_integration" => "API Integrations".into(),
        "contact_management" => "Contact Database".into(),
        "contract_publishing" => "Digital Signing".into(),
        "data_extraction" => "Data Automation".into(),
        other => title_case(&other.replace('_', " ")),
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn bullets<'a>(out: &mut String, heading: &str, items: impl IntoIterator<Item = &'a String>) -> fmt::Result {
    writeln!(out, "**{heading}**")?;
    for item in items {
        writeln!(out, "• {item}")?;
    }
    Ok(())
}

/// Markdown answer for the chat surface. Empty sections are omitted.
pub fn generate_response(assessment: &Assessment, question: &str) -> String {
    match render(assessment) {
        Ok(text) => text,
        Err(e) => {
            error!(question, error = %e, "response rendering failed");
            error_response(&e.to_string())
        }
    }
}

fn render(a: &Assessment) -> Result<String, fmt::Error> {
    let mut parts: Vec<String> = Vec::new();

    let mut header = String::new();
    write!(
        header,
        "**{} Quick Answer: {}** {}\n\n**{}**",
        feasibility_icon(a.feasibility),
        a.feasibility.label(),
        confidence_icon(a.confidence),
        a.quick_answer
    )?;
    parts.push(header);

    if a.capabilities_used.is_empty() {
        parts.push("This request can be assessed based on OneFlow's general API capabilities.".into());
    } else {
        let sentences: Vec<String> = a.capabilities_used.iter().map(|c| capability_sentence(c)).collect();
        let mut s = String::new();
        bullets(&mut s, "How this works with OneFlow:", &sentences)?;
        parts.push(s);
    }

    if !a.caveats.is_empty() {
        let mut s = String::new();
        bullets(&mut s, "Important Considerations:", &a.caveats)?;
        parts.push(s);
    }

    if !a.business_impact.is_empty() && a.business_impact != DEFAULT_BUSINESS_IMPACT {
        parts.push(format!("**Business Impact:** {}", a.business_impact));
    }

    if !a.implementation_steps.is_empty() {
        let mut s = String::new();
        writeln!(s, "**Implementation Steps:**")?;
        for (i, step) in a.implementation_steps.iter().enumerate() {
            writeln!(s, "{}. {step}", i + 1)?;
        }
        parts.push(s);
    }

    if !a.api_requirements.is_empty() {
        let mut s = String::new();
        bullets(&mut s, "API Requirements:", &a.api_requirements)?;
        parts.push(s);
    }

    if !a.related_features.is_empty() {
        let names: Vec<String> = a.related_features.iter().take(TOP_N).map(|f| feature_name(f)).collect();
        let mut s = String::new();
        bullets(&mut s, "You might also be interested in:", &names)?;
        parts.push(s);
    }

    if !a.follow_up_questions.is_empty() {
        let mut s = String::new();
        bullets(
            &mut s,
            "To better help you, I'd like to know:",
            a.follow_up_questions.iter().take(TOP_N),
        )?;
        parts.push(s);
    }

    if !a.sources.is_empty() {
        let labels: Vec<String> = a
            .sources
            .iter()
            .take(MAX_SOURCES)
            .map(|r| match r.label() {
                Some(l) => format!("{l} ({})", r.source_type),
                None => r.source_type.to_string(),
            })
            .collect();
        let mut s = String::new();
        bullets(&mut s, "Sources consulted:", &labels)?;
        parts.push(s);
    }

    let mut footer = String::new();
    write!(
        footer,
        "**{} Confidence Level: {}**",
        confidence_icon(a.confidence),
        a.confidence
    )?;
    if !a.confidence_reasoning.is_empty() {
        write!(footer, " - {}", a.confidence_reasoning)?;
    }
    if a.fallback_used {
        write!(footer, "\n\n{FALLBACK_NOTE}")?;
    }
    parts.push(footer);

    Ok(parts.join("\n\n"))
}

pub fn error_response(message: &str) -> String {
    format!(
        "**❌ Assessment Error**

I encountered an issue while generating this response: {message}

Please try rephrasing your question or contact support if the issue persists.

**You can try asking:**
• \"Can OneFlow create contracts from templates?\"
• \"Does OneFlow support file attachments?\"
• \"Can we set up multi-party contracts?\"
"
    )
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryExport {
    pub timestamp: DateTime<Utc>,
    pub question: String,
    pub feasibility: String,
    pub confidence: Confidence,
    pub quick_answer: String,
    pub key_caveats: Vec<String>,
    pub business_impact: String,
    pub capabilities_involved: Vec<String>,
    pub follow_up_needed: bool,
    pub assessment_method: String,
}

pub fn summary_export(assessment: &Assessment, question: &str) -> SummaryExport {
    summary_export_at(assessment, question, Utc::now())
}

pub fn summary_export_at(assessment: &Assessment, question: &str, now: DateTime<Utc>) -> SummaryExport {
    SummaryExport {
        timestamp: now,
        question: question.to_string(),
        feasibility: assessment.feasibility.label().to_string(),
        confidence: assessment.confidence,
        quick_answer: assessment.quick_answer.clone(),
        key_caveats: assessment.caveats.clone(),
        business_impact: assessment.business_impact.clone(),
        capabilities_involved: assessment.capabilities_used.clone(),
        follow_up_needed: !assessment.follow_up_questions.is_empty(),
        assessment_method: if assessment.fallback_used { "Fallback" } else { "AI-Powered" }.to_string(),
    }
}

pub fn format_for_email(assessment: &Assessment, question: &str) -> String {
    let s = summary_export(assessment, question);
    let caveats = s
        .key_caveats
        .iter()
        .map(|c| format!("• {c}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "OneFlow API Feasibility Assessment

Question: {question}

Assessment: {} (Confidence: {})

Summary: {}

Key Considerations:
{caveats}

Business Impact: {}

Generated: {}
Assessment Method: {}
",
        s.feasibility,
        s.confidence,
        s.quick_answer,
        s.business_impact,
        s.timestamp.to_rfc3339(),
        s.assessment_method
    )
}
