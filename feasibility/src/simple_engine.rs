//! Single-call engine: question plus capability catalog to the quick model,
//! keyword matching when the model is unavailable.

use std::sync::Arc;

use ai_llm_service::ChatCompletion;
use tracing::{debug, warn};

use crate::assessment::{ConfidenceLevel, Feasibility, FeasibilityReport, confidence_reasoning};
use crate::capabilities::{catalog_prompt_lines, list_capabilities};
use crate::error::{FeasibilityError, FeasibilityResult};

/// Characters of unstructured model text kept as the quick answer.
const TEXT_FALLBACK_CHARS: usize = 200;

pub struct SimpleEngine {
    chat: Arc<dyn ChatCompletion>,
}

impl SimpleEngine {
    pub fn new(chat: Arc<dyn ChatCompletion>) -> Self {
        Self { chat }
    }

    pub fn model_name(&self) -> &str {
        self.chat.model_name()
    }

    /// Never fails: provider errors fall back to keyword matching and
    /// unparsable replies to the text fallback.
    pub async fn assess(&self, question: &str) -> FeasibilityReport {
        let system = system_prompt();
        let prompt = assessment_prompt(question);
        match self.chat.complete(Some(&system), &prompt).await {
            Ok(reply) => {
                debug!(model = %self.chat.model_name(), chars = reply.len(), "simple engine reply");
                parse_model_reply(&reply)
            }
            Err(e) => {
                warn!(error = %e, "model unavailable, using keyword assessment");
                keyword_fallback(question)
            }
        }
    }
}

pub fn system_prompt() -> String {
    format!(
        "You are a OneFlow API expert helping sales teams assess technical feasibility.

OneFlow is a contract management platform with these key capabilities:
{}

Your job is to analyze sales questions and provide clear, business-focused feasibility assessments.

Respond in JSON format with these fields:
- \"feasibility\": \"Yes\" | \"No\" | \"Conditional\"
- \"confidence\": \"High\" | \"Medium\" | \"Low\"
- \"quick_answer\": Brief, sales-friendly explanation
- \"capabilities_used\": List of relevant OneFlow capabilities
- \"important_caveats\": List of key limitations or requirements
- \"business_impact\": How caveats might affect implementation or sales
- \"related_features\": Other OneFlow capabilities that might be relevant
- \"follow_up_questions\": Questions to better understand requirements

Guidelines:
- Use business language, not technical jargon
- Be honest about limitations
- Focus on what matters for sales conversations
- Consider implementation complexity in confidence scoring
- Highlight caveats that could affect deal closing",
        catalog_prompt_lines()
    )
}

pub fn assessment_prompt(question: &str) -> String {
    format!(
        "Sales Question: \"{question}\"

Please assess the technical feasibility of this request using OneFlow's API capabilities.

Consider:
1. Is this technically possible with OneFlow?
2. What are the key capabilities involved?
3. What important caveats should sales know about?
4. How might implementation complexity affect the sales process?
5. What related features might be valuable to mention?

Provide a structured JSON assessment.
"
    )
}

/// Fenced ```json block first, then the first `{` .. last `}` span.
fn json_span(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let body = &text[start + "```json".len()..];
        let end = body.find("```").unwrap_or(body.len());
        return Some(body[..end].trim());
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn parse_report(text: &str) -> FeasibilityResult<FeasibilityReport> {
    let span = json_span(text).ok_or_else(|| FeasibilityError::Parse("no JSON object".into()))?;
    serde_json::from_str(span).map_err(|e| FeasibilityError::Parse(e.to_string()))
}

/// Structured report from model text. Missing fields are defaulted and the
/// confidence reasoning is always recomputed.
pub fn parse_model_reply(text: &str) -> FeasibilityReport {
    match parse_report(text) {
        Ok(mut report) => {
            report.confidence_reasoning =
                confidence_reasoning(report.confidence, report.important_caveats.len());
            report.fallback_used = false;
            report
        }
        Err(e) => {
            warn!(error = %e, "unstructured model reply");
            text_fallback(text)
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Canned report chosen by keywords. File wording is checked before
/// contract wording so attachment questions get the file caveats.
pub fn keyword_fallback(question: &str) -> FeasibilityReport {
    let q = question.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| q.contains(w));

    if has_any(&["pdf", "file", "attach", "upload"]) {
        FeasibilityReport {
            feasibility: Feasibility::Yes,
            confidence: ConfidenceLevel::Medium,
            quick_answer: "File attachments are supported, with some configuration requirements."
                .into(),
            capabilities_used: strings(&["file_management"]),
            important_caveats: strings(&[
                "Template must be configured to allow file attachments",
                "Files are added after contract creation (separate API call)",
                "File size and format restrictions apply",
            ]),
            business_impact: "May require template reconfiguration for some use cases".into(),
            related_features: strings(&["contract_creation", "template_management"]),
            follow_up_questions: strings(&[
                "What file types need to be supported?",
                "Who will be uploading the files?",
            ]),
            confidence_reasoning: "Requires template configuration considerations".into(),
            fallback_used: true,
        }
    } else if has_any(&["create", "contract", "template"]) {
        FeasibilityReport {
            feasibility: Feasibility::Yes,
            confidence: ConfidenceLevel::High,
            quick_answer: "Contract creation from templates is a core OneFlow capability.".into(),
            capabilities_used: strings(&["contract_creation", "template_management"]),
            important_caveats: strings(&[
                "Requires a valid, active template",
                "Template must be properly configured for intended use",
            ]),
            business_impact: "Standard implementation - no unusual complexity".into(),
            related_features: strings(&["file_management", "multi_party_contracts"]),
            follow_up_questions: strings(&[
                "What type of contract template do you need?",
                "How many parties will typically be involved?",
            ]),
            confidence_reasoning: "Core OneFlow functionality".into(),
            fallback_used: true,
        }
    } else {
        FeasibilityReport {
            feasibility: Feasibility::Conditional,
            confidence: ConfidenceLevel::Low,
            quick_answer: "Need more specific information to assess feasibility.".into(),
            capabilities_used: Vec::new(),
            important_caveats: strings(&["Insufficient information for detailed assessment"]),
            business_impact: "Cannot assess without more details".into(),
            related_features: list_capabilities()
                .into_iter()
                .take(3)
                .map(str::to_string)
                .collect(),
            follow_up_questions: strings(&[
                "Can you provide more specific details about what you need to accomplish?",
                "What is the main business process you're trying to automate?",
            ]),
            confidence_reasoning: "Need more information for accurate assessment".into(),
            fallback_used: true,
        }
    }
}

/// Report built from model text that carried no usable JSON.
pub fn text_fallback(text: &str) -> FeasibilityReport {
    let quick_answer = if text.chars().count() > TEXT_FALLBACK_CHARS {
        let head: String = text.chars().take(TEXT_FALLBACK_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    };
    FeasibilityReport {
        feasibility: Feasibility::Conditional,
        confidence: ConfidenceLevel::Medium,
        quick_answer,
        capabilities_used: Vec::new(),
        important_caveats: strings(&["Assessment based on unstructured analysis"]),
        business_impact: "Manual review recommended".into(),
        related_features: Vec::new(),
        follow_up_questions: strings(&["Please rephrase your question for more accurate assessment"]),
        confidence_reasoning: "Unstructured response format".into(),
        fallback_used: true,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::assessment::DEFAULT_BUSINESS_IMPACT;

    use ai_llm_service::{AiLlmError, ChatFuture};
    use ai_llm_service::error_handler::{Provider, ProviderError, ProviderErrorKind};

    /// Chat double: fixed reply, or a provider error when `None`.
    pub(crate) struct ScriptedChat {
        pub reply: Option<String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                reply: None,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatCompletion for ScriptedChat {
        fn complete<'a>(&'a self, _system: Option<&'a str>, prompt: &'a str) -> ChatFuture<'a> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let out = match &self.reply {
                Some(r) => Ok(r.clone()),
                None => Err(AiLlmError::Provider(ProviderError::new(
                    Provider::OpenAI,
                    ProviderErrorKind::MissingApiKey,
                ))),
            };
            Box::pin(async move { out })
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn attachment_question_without_model_is_file_management() {
        let engine = SimpleEngine::new(Arc::new(ScriptedChat::failing()));
        let r = engine
            .assess("Can we create a contract from a template and add a PDF to it?")
            .await;
        assert_eq!(r.feasibility, Feasibility::Yes);
        assert_eq!(r.confidence, ConfidenceLevel::Medium);
        assert!(r.capabilities_used.contains(&"file_management".to_string()));
        assert!(r.fallback_used);
    }

    #[test]
    fn keyword_tiers() {
        let r = keyword_fallback("Create a contract from our NDA template");
        assert_eq!(r.confidence, ConfidenceLevel::High);
        assert_eq!(r.capabilities_used, ["contract_creation", "template_management"]);

        let r = keyword_fallback("Does it integrate with our ERP?");
        assert_eq!(r.feasibility, Feasibility::Conditional);
        assert_eq!(r.confidence, ConfidenceLevel::Low);
        assert_eq!(
            r.related_features,
            ["contract_creation", "file_management", "multi_party_contracts"]
        );
    }

    #[tokio::test]
    async fn fenced_reply_is_parsed_and_defaulted() {
        let reply = "Sure!\n```json\n{\"feasibility\": \"Conditional\", \"confidence\": \"Low\", \"important_caveats\": [\"x\", \"y\", \"z\"]}\n```\nThanks";
        let chat = Arc::new(ScriptedChat::replying(reply));
        let engine = SimpleEngine::new(chat.clone());
        let r = engine.assess("Can we sync signed contracts to SAP?").await;

        assert_eq!(r.feasibility, Feasibility::Conditional);
        assert_eq!(r.quick_answer, "Technical assessment completed");
        assert_eq!(
            r.confidence_reasoning,
            "Complex implementation with 3 important considerations"
        );
        assert!(!r.fallback_used);

        let prompts = chat.prompts.lock().unwrap();
        assert!(prompts[0].contains("Sales Question: \"Can we sync signed contracts to SAP?\""));
    }

    #[test]
    fn bare_braces_are_found() {
        let r = parse_model_reply("Here you go: {\"feasibility\": \"No\", \"confidence\": \"High\"} done");
        assert_eq!(r.feasibility, Feasibility::No);
        assert_eq!(
            r.confidence_reasoning,
            "Standard OneFlow capability with well-documented implementation path"
        );
    }

    #[test]
    fn numeric_confidence_and_null_fields_keep_the_verdict() {
        let r = parse_model_reply(r#"{"feasibility":"No","confidence":0.8,"quick_answer":"Not supported"}"#);
        assert_eq!(r.feasibility, Feasibility::No);
        assert_eq!(r.confidence, ConfidenceLevel::High);
        assert_eq!(r.quick_answer, "Not supported");
        assert!(!r.fallback_used);

        let r = parse_model_reply(
            r#"{"feasibility":"Yes","confidence":"Medium","quick_answer":"Supported","business_impact":null,"important_caveats":"Needs a template"}"#,
        );
        assert_eq!(r.feasibility, Feasibility::Yes);
        assert_eq!(r.business_impact, DEFAULT_BUSINESS_IMPACT);
        assert_eq!(r.important_caveats, ["Needs a template"]);
        assert_eq!(
            r.confidence_reasoning,
            "Feasible with 1 key requirements that need attention"
        );
        assert!(!r.fallback_used);
    }

    #[test]
    fn prose_reply_is_truncated() {
        let long = "a".repeat(250);
        let r = parse_model_reply(&long);
        assert!(r.fallback_used);
        assert_eq!(r.quick_answer.chars().count(), 203);
        assert!(r.quick_answer.ends_with("..."));
        assert_eq!(r.important_caveats, ["Assessment based on unstructured analysis"]);

        let r = parse_model_reply("{ not json }");
        assert_eq!(r.quick_answer, "{ not json }");
        assert_eq!(r.confidence, ConfidenceLevel::Medium);
    }

    #[test]
    fn system_prompt_embeds_catalog() {
        let p = system_prompt();
        assert!(p.contains("- data_extraction: Extract data from signed contracts"));
        assert!(p.contains("\"follow_up_questions\""));
    }
}
