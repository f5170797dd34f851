//! Context assembly, prompts and reply parsing for the hybrid engine.

use rag_store::{SearchResult, SourceType};

use crate::assessment::HybridAssessment;
use crate::error::{FeasibilityError, FeasibilityResult};

/// Groups results by source type (first-seen order) into `--- API SPEC ---` style sections.
pub fn build_context(results: &[SearchResult]) -> String {
    let mut groups: Vec<(SourceType, Vec<&str>)> = Vec::new();
    for r in results {
        match groups.iter_mut().find(|(t, _)| *t == r.source_type) {
            Some((_, contents)) => contents.push(r.content.as_str()),
            None => groups.push((r.source_type, vec![r.content.as_str()])),
        }
    }

    groups
        .into_iter()
        .map(|(t, contents)| {
            let heading = t.as_str().to_uppercase().replace('_', " ");
            format!("\n--- {heading} ---\n{}", contents.join("\n\n"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn system_prompt(context: &str, question: &str) -> String {
    format!(
        r#"You are an expert OneFlow integration consultant helping sales teams assess technical feasibility.

CONTEXT FROM ONEFLOW DOCUMENTATION:
{context}

SALES QUESTION: {question}

Provide a comprehensive assessment in JSON format:
{{
    "feasibility": "YES|NO|CONDITIONAL|NEEDS_ANALYSIS",
    "confidence": 0.0-1.0,
    "explanation": "Clear, business-focused explanation",
    "api_requirements": ["Required API endpoints and methods"],
    "integration_complexity": "LOW|MEDIUM|HIGH with detailed reasoning",
    "business_context": "How this fits into business workflows",
    "caveats": ["Important limitations, dependencies, requirements"],
    "related_endpoints": ["Relevant API endpoints from context"],
    "integration_patterns": ["Applicable integration patterns"],
    "implementation_steps": ["High-level implementation steps"],
    "timeline_estimate": "Realistic development timeline",
    "cost_implications": "Development cost considerations"
}}

GUIDELINES:
- Use business language, avoid technical jargon
- Be specific about API requirements and endpoints
- Consider integration complexity realistically
- Focus on sales impact and business value
- Highlight any deal-breaking limitations
- Reference specific OneFlow capabilities from context
- Provide actionable implementation guidance"#
    )
}

pub fn user_prompt(context: &str, question: &str) -> String {
    format!("Context: {context}\n\nQuestion: {question}")
}

/// Parses the span from the first `{` to the last `}` of the reply.
pub fn parse_reply(reply: &str, sources: Vec<SearchResult>) -> FeasibilityResult<HybridAssessment> {
    let start = reply
        .find('{')
        .ok_or_else(|| FeasibilityError::Parse("No JSON found in response".into()))?;
    let end = reply
        .rfind('}')
        .filter(|e| *e > start)
        .ok_or_else(|| FeasibilityError::Parse("No JSON found in response".into()))?;

    let mut assessment: HybridAssessment = serde_json::from_str(&reply[start..=end])
        .map_err(|e| FeasibilityError::Parse(e.to_string()))?;
    assessment.sources = sources;
    assessment.fallback_used = false;
    Ok(assessment)
}
